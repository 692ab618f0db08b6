//! Histogram of product prices in fixed ranges of 100.

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

/// The number of price ranges in the histogram.
pub const PRICE_RANGE_COUNT: usize = 10;

/// The width of each price range.
const PRICE_RANGE_WIDTH: f64 = 100.0;

/// The number of products in a price range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    /// The label for the range, e.g. "101-200" or "901-above".
    pub range: String,
    /// The number of products priced in the range.
    pub count: u64,
}

/// The label of the price range at `index`.
///
/// The first range is "0-100", the last is "901-above".
pub fn price_range_label(index: usize) -> String {
    match index {
        0 => "0-100".to_owned(),
        index if index >= PRICE_RANGE_COUNT - 1 => {
            format!("{}-above", (PRICE_RANGE_COUNT - 1) * 100 + 1)
        }
        index => format!("{}-{}", index * 100 + 1, (index + 1) * 100),
    }
}

/// The index of the price range that `price` falls into.
///
/// Ranges include their upper bound, so 100 is in "0-100" and 100.01 is in
/// "101-200". Prices at or below zero fall into the first range and
/// everything above 900 falls into the last.
pub fn price_range_index(price: f64) -> usize {
    ((price / PRICE_RANGE_WIDTH).ceil() as usize)
        .saturating_sub(1)
        .min(PRICE_RANGE_COUNT - 1)
}

/// Count the prices in each range, including empty ranges.
pub fn count_price_ranges(prices: &[f64]) -> Vec<PriceRangeCount> {
    let mut counts = [0u64; PRICE_RANGE_COUNT];

    for &price in prices {
        counts[price_range_index(price)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| PriceRangeCount {
            range: price_range_label(index),
            count,
        })
        .collect()
}

/// Get the price histogram for product transactions in `month`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_price_range_counts(
    month: SaleMonth,
    connection: &Connection,
) -> Result<Vec<PriceRangeCount>, Error> {
    let prices = connection
        .prepare("SELECT price FROM product_transaction WHERE sale_month = ?1")?
        .query_map([month.number()], |row| row.get(0))?
        .collect::<Result<Vec<f64>, rusqlite::Error>>()?;

    Ok(count_price_ranges(&prices))
}

/// Fetch the price histogram for the month named in `query`.
///
/// # Errors
/// Returns a client error if the month is missing or invalid, otherwise any
/// database error.
pub async fn fetch_price_range_counts(
    state: &ProductState,
    query: &MonthQuery,
) -> Result<Vec<PriceRangeCount>, Error> {
    let month = parse_required_month(query.month.as_deref())?;

    run_blocking(&state.db_connection, move |connection| {
        get_price_range_counts(month, connection)
    })
    .await
}

/// Get the number of products in each price range for a month.
pub async fn get_bar_chart_endpoint(
    State(state): State<ProductState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    match fetch_price_range_counts(&state, &query).await {
        Ok(counts) => Json(counts).into_response(),
        Err(error) => error.into_api_response("fetching bar chart data"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use time::{Month, macros::datetime};

    use crate::{
        endpoints,
        month::SaleMonth,
        test_utils::{get_test_connection, insert_sale, product_state},
    };

    use super::{
        PRICE_RANGE_COUNT, PriceRangeCount, count_price_ranges, get_bar_chart_endpoint,
        get_price_range_counts, price_range_index, price_range_label,
    };

    #[test]
    fn labels_cover_all_ranges() {
        let labels: Vec<_> = (0..PRICE_RANGE_COUNT).map(price_range_label).collect();

        assert_eq!(
            labels,
            [
                "0-100",
                "101-200",
                "201-300",
                "301-400",
                "401-500",
                "501-600",
                "601-700",
                "701-800",
                "801-900",
                "901-above",
            ]
        );
    }

    #[test]
    fn upper_bounds_are_inclusive() {
        assert_eq!(price_range_index(0.0), 0);
        assert_eq!(price_range_index(100.0), 0);
        assert_eq!(price_range_index(100.5), 1);
        assert_eq!(price_range_index(200.0), 1);
        assert_eq!(price_range_index(200.01), 2);
        assert_eq!(price_range_index(900.0), 8);
        assert_eq!(price_range_index(900.01), 9);
        assert_eq!(price_range_index(10_000.0), 9);
    }

    #[test]
    fn non_positive_prices_fall_in_first_range() {
        assert_eq!(price_range_index(-5.0), 0);
        assert_eq!(price_range_index(f64::NAN), 0);
    }

    #[test]
    fn always_returns_every_range() {
        let got = count_price_ranges(&[]);

        assert_eq!(got.len(), PRICE_RANGE_COUNT);
        assert!(got.iter().all(|range| range.count == 0));
    }

    #[test]
    fn counts_prices_in_month() {
        let conn = get_test_connection();
        for price in [5.0, 100.0, 150.0, 999.99] {
            insert_sale(&conn, price, datetime!(2022-09-10 00:00:00 UTC), "a", true);
        }
        insert_sale(&conn, 50.0, datetime!(2022-10-01 00:00:00 UTC), "a", true);

        let got = get_price_range_counts(SaleMonth::from(Month::September), &conn).unwrap();

        assert_eq!(
            got[0],
            PriceRangeCount {
                range: "0-100".to_owned(),
                count: 2
            }
        );
        assert_eq!(got[1].count, 1);
        assert_eq!(got[9].count, 1);
        assert_eq!(got.iter().map(|range| range.count).sum::<u64>(), 4);
    }

    #[tokio::test]
    async fn endpoint_returns_ranges_in_order() {
        let conn = get_test_connection();
        insert_sale(&conn, 450.0, datetime!(2022-09-10 00:00:00 UTC), "a", true);
        let app = Router::new()
            .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
            .with_state(product_state(conn));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server
            .get(endpoints::BAR_CHART)
            .add_query_param("month", "September")
            .await;

        response.assert_status_ok();
        let got = response.json::<Vec<PriceRangeCount>>();
        assert_eq!(got.len(), PRICE_RANGE_COUNT);
        assert_eq!(got[4].range, "401-500");
        assert_eq!(got[4].count, 1);
    }
}
