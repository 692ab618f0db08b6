//! One response holding every report for a month.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    month::MonthQuery,
    product::{ProductState, ProductTransaction, TransactionsQuery, list_product_transactions},
};

use super::{
    categories::{CategoryCount, fetch_category_counts},
    price_ranges::{PriceRangeCount, fetch_price_range_counts},
    summary::{MonthStatistics, fetch_month_statistics},
};

/// The page of transactions and the three reports for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// The requested page of product transactions.
    pub transactions: Vec<ProductTransaction>,
    /// The sale totals for the month.
    pub statistics: MonthStatistics,
    /// The price histogram for the month.
    pub bar_chart: Vec<PriceRangeCount>,
    /// The category counts for the month.
    pub pie_chart: Vec<CategoryCount>,
}

/// Run the transaction listing and the three reports concurrently.
///
/// The month applies to all four reads, while the page and search only apply
/// to the transaction listing.
///
/// # Errors
/// Returns the first error from any of the reads.
pub async fn fetch_combined_data(
    state: &ProductState,
    query: TransactionsQuery,
) -> Result<CombinedData, Error> {
    let month_query = MonthQuery {
        month: query.month.clone(),
    };

    let (transactions, statistics, bar_chart, pie_chart) = tokio::try_join!(
        list_product_transactions(state, query),
        fetch_month_statistics(state, &month_query),
        fetch_price_range_counts(state, &month_query),
        fetch_category_counts(state, &month_query),
    )?;

    Ok(CombinedData {
        transactions,
        statistics,
        bar_chart,
        pie_chart,
    })
}

/// Get the transactions, statistics, bar chart and pie chart for a month.
pub async fn get_combined_data_endpoint(
    State(state): State<ProductState>,
    query: Result<Query<TransactionsQuery>, QueryRejection>,
) -> Response {
    let data = match query {
        Ok(Query(query)) => fetch_combined_data(&state, query).await,
        Err(rejection) => Err(rejection.into()),
    };

    match data {
        Ok(data) => Json(data).into_response(),
        Err(error) => error.into_api_response("fetching combined data"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use time::macros::datetime;

    use crate::{
        endpoints,
        test_utils::{get_test_connection, insert_sale, product_state},
    };

    use super::{CombinedData, get_combined_data_endpoint};

    fn get_test_server() -> TestServer {
        let conn = get_test_connection();
        insert_sale(&conn, 120.0, datetime!(2022-07-01 08:00:00 UTC), "electronics", true);
        insert_sale(&conn, 80.0, datetime!(2021-07-20 08:00:00 UTC), "jewelery", false);
        insert_sale(&conn, 15.0, datetime!(2022-08-01 08:00:00 UTC), "jewelery", true);

        let app = Router::new()
            .route(endpoints::COMBINED_DATA, get(get_combined_data_endpoint))
            .with_state(product_state(conn));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn combines_all_reports_for_month() {
        let server = get_test_server();

        let response = server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", "July")
            .await;

        response.assert_status_ok();
        let got = response.json::<CombinedData>();
        assert_eq!(got.transactions.len(), 2);
        assert_eq!(got.statistics.total_sale_amount, 200.0);
        assert_eq!(got.statistics.total_sold_items, 1);
        assert_eq!(got.statistics.total_not_sold_items, 1);
        assert_eq!(got.bar_chart[0].count, 1);
        assert_eq!(got.bar_chart[1].count, 1);
        assert_eq!(got.pie_chart.len(), 2);
    }

    #[tokio::test]
    async fn uses_camel_case_keys() {
        let server = get_test_server();

        let response = server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", "7")
            .await;

        let json = response.json::<serde_json::Value>();
        for key in ["transactions", "statistics", "barChart", "pieChart"] {
            assert!(json.get(key).is_some(), "missing key {key} in {json}");
        }
    }

    #[tokio::test]
    async fn missing_month_fails_whole_request() {
        let server = get_test_server();

        let response = server.get(endpoints::COMBINED_DATA).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response
            .assert_text("Error fetching combined data: the month query parameter is required");
    }

    #[tokio::test]
    async fn malformed_per_page_is_a_bad_request() {
        let server = get_test_server();

        let response = server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", "July")
            .add_query_param("perPage", "ten")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let text = response.text();
        assert!(
            text.starts_with("Error fetching combined data: invalid query string"),
            "unexpected body {text}"
        );
    }
}
