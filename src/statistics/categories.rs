//! Number of products in each category for a month.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::run_blocking,
    month::{MonthQuery, SaleMonth, parse_required_month},
    product::ProductState,
};

/// The number of products in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The name of the category.
    pub category: String,
    /// The number of products in the category.
    pub count: u64,
}

/// Count the product transactions in each category for `month`, sorted by category.
///
/// Categories without any records in the month are left out.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_category_counts(
    month: SaleMonth,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    connection
        .prepare(
            "SELECT category, COUNT(id) FROM product_transaction
            WHERE sale_month = ?1
            GROUP BY category
            ORDER BY category ASC",
        )?
        .query_map([month.number()], |row| {
            let count: i64 = row.get(1)?;

            Ok(CategoryCount {
                category: row.get(0)?,
                count: count as u64,
            })
        })?
        .map(|count_result| count_result.map_err(Error::SqlError))
        .collect()
}

/// Fetch the category counts for the month named in `query`.
///
/// # Errors
/// Returns a client error if the month is missing or invalid, otherwise any
/// database error.
pub async fn fetch_category_counts(
    state: &ProductState,
    query: &MonthQuery,
) -> Result<Vec<CategoryCount>, Error> {
    let month = parse_required_month(query.month.as_deref())?;

    run_blocking(&state.db_connection, move |connection| {
        get_category_counts(month, connection)
    })
    .await
}

/// Get the number of products in each category for a month.
pub async fn get_pie_chart_endpoint(
    State(state): State<ProductState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    match fetch_category_counts(&state, &query).await {
        Ok(counts) => Json(counts).into_response(),
        Err(error) => error.into_api_response("fetching pie chart data"),
    }
}
