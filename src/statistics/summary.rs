//! Sale totals for a month.

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

/// Totals over every product transaction in a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthStatistics {
    /// The sum of the prices of all products listed in the month, sold or not.
    pub total_sale_amount: f64,
    /// The number of products that sold.
    pub total_sold_items: u64,
    /// The number of products that did not sell.
    pub total_not_sold_items: u64,
}

/// Calculate the sale totals for `month`.
///
/// A month with no records has a total of zero and no items.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_month_statistics(
    month: SaleMonth,
    connection: &Connection,
) -> Result<MonthStatistics, Error> {
    let (total_sale_amount, total_sold_items, total_not_sold_items): (f64, i64, i64) = connection
        .prepare(
            "SELECT
                COALESCE(SUM(price), 0.0),
                COALESCE(SUM(CASE WHEN sold THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN sold THEN 0 ELSE 1 END), 0)
            FROM product_transaction
            WHERE sale_month = ?1",
        )?
        .query_row([month.number()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;

    Ok(MonthStatistics {
        total_sale_amount,
        total_sold_items: total_sold_items as u64,
        total_not_sold_items: total_not_sold_items as u64,
    })
}

/// Fetch the statistics for the month named in `query`.
///
/// # Errors
/// Returns a client error if the month is missing or invalid, otherwise any
/// database error.
pub async fn fetch_month_statistics(
    state: &ProductState,
    query: &MonthQuery,
) -> Result<MonthStatistics, Error> {
    let month = parse_required_month(query.month.as_deref())?;

    run_blocking(&state.db_connection, move |connection| {
        get_month_statistics(month, connection)
    })
    .await
}

/// Get the total sale amount and the number of sold and unsold items for a month.
pub async fn get_statistics_endpoint(
    State(state): State<ProductState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    match fetch_month_statistics(&state, &query).await {
        Ok(statistics) => Json(statistics).into_response(),
        Err(error) => error.into_api_response("fetching statistics"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use time::{Month, macros::datetime};

    use crate::{
        endpoints,
        month::SaleMonth,
        test_utils::{get_test_connection, insert_sale, product_state},
    };

    use super::{MonthStatistics, get_month_statistics, get_statistics_endpoint};

    #[test]
    fn sums_prices_and_counts_sold_items() {
        let conn = get_test_connection();
        insert_sale(&conn, 100.0, datetime!(2021-03-01 00:00:00 UTC), "a", true);
        insert_sale(&conn, 50.5, datetime!(2022-03-31 23:59:59 UTC), "b", false);
        insert_sale(&conn, 25.0, datetime!(2022-03-15 12:00:00 UTC), "b", true);
        // Neighbouring months are excluded.
        insert_sale(&conn, 999.0, datetime!(2022-02-28 23:59:59 UTC), "a", true);
        insert_sale(&conn, 999.0, datetime!(2022-04-01 00:00:00 UTC), "a", false);

        let got = get_month_statistics(SaleMonth::from(Month::March), &conn).unwrap();

        assert_eq!(
            got,
            MonthStatistics {
                total_sale_amount: 175.5,
                total_sold_items: 2,
                total_not_sold_items: 1,
            }
        );
    }

    #[test]
    fn empty_month_is_all_zero() {
        let conn = get_test_connection();
        insert_sale(&conn, 10.0, datetime!(2022-01-10 00:00:00 UTC), "a", true);

        let got = get_month_statistics(SaleMonth::from(Month::June), &conn).unwrap();

        assert_eq!(
            got,
            MonthStatistics {
                total_sale_amount: 0.0,
                total_sold_items: 0,
                total_not_sold_items: 0,
            }
        );
    }

    #[tokio::test]
    async fn endpoint_returns_camel_case_json() {
        let conn = get_test_connection();
        insert_sale(&conn, 10.0, datetime!(2022-01-10 00:00:00 UTC), "a", true);
        let app = Router::new()
            .route(endpoints::STATISTICS, get(get_statistics_endpoint))
            .with_state(product_state(conn));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "jan")
            .await;

        response.assert_status_ok();
        response.assert_json(&serde_json::json!({
            "totalSaleAmount": 10.0,
            "totalSoldItems": 1,
            "totalNotSoldItems": 0,
        }));
    }

    #[tokio::test]
    async fn endpoint_requires_month() {
        let app = Router::new()
            .route(endpoints::STATISTICS, get(get_statistics_endpoint))
            .with_state(product_state(get_test_connection()));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server.get(endpoints::STATISTICS).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("Error fetching statistics: the month query parameter is required");
    }
}
