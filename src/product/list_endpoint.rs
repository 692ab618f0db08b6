//! Defines the route handler that lists product transactions as JSON.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    db::run_blocking,
    month::parse_optional_month,
    pagination::{Pagination, PaginationConfig},
};

use super::{
    models::ProductTransaction,
    query::{TransactionFilter, get_product_transactions},
};

/// The state needed to read product transactions and reports.
#[derive(Debug, Clone)]
pub struct ProductState {
    /// The database connection for reading product transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ProductState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for listing product transactions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    /// Only list sales from this month, e.g. "March" or "3".
    pub month: Option<String>,
    /// The one-based page number.
    pub page: Option<u64>,
    /// The number of records per page.
    pub per_page: Option<u64>,
    /// Text to look for in the title, description or price.
    pub search: Option<String>,
}

/// List product transactions matching a search, one page at a time.
pub async fn get_transactions_endpoint(
    State(state): State<ProductState>,
    query: Result<Query<TransactionsQuery>, QueryRejection>,
) -> Response {
    let transactions = match query {
        Ok(Query(query)) => list_product_transactions(&state, query).await,
        Err(rejection) => Err(rejection.into()),
    };

    match transactions {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_api_response("fetching transactions"),
    }
}

/// Validate `query` and fetch the requested page of product transactions.
///
/// # Errors
/// Returns a client error for an invalid month or page, otherwise any
/// database error.
pub async fn list_product_transactions(
    state: &ProductState,
    query: TransactionsQuery,
) -> Result<Vec<ProductTransaction>, Error> {
    let month = parse_optional_month(query.month.as_deref())?;
    let pagination = Pagination::new(query.page, query.per_page, &state.pagination_config)?;
    let filter = TransactionFilter::new(query.search.as_deref().unwrap_or_default(), month);

    run_blocking(&state.db_connection, move |connection| {
        get_product_transactions(&filter, pagination, connection)
    })
    .await
}
