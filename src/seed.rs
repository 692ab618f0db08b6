//! Loads the product transaction feed into the database.
//!
//! The feed is a JSON array of records shaped like [NewProductTransaction].
//! Loading it replaces every existing record, so `/initialize` can be called
//! repeatedly without creating duplicates.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::run_blocking,
    product::{NewProductTransaction, delete_all_product_transactions, insert_product_transactions},
};

/// Where the seed data is downloaded from unless configured otherwise.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// The state needed to download and store the seed data.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection the seed data is written to.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client used to download the feed.
    pub http_client: reqwest::Client,
    /// The URL of the feed.
    pub seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}

/// Download the seed data and replace the contents of the database with it.
pub async fn initialize_endpoint(State(state): State<SeedState>) -> Response {
    match seed_database(&state).await {
        Ok(count) => {
            tracing::info!("Loaded {count} product transactions from {}", state.seed_url);
            (StatusCode::OK, "Database initialized with seed data").into_response()
        }
        Err(error) => error.into_api_response("initializing database"),
    }
}

async fn seed_database(state: &SeedState) -> Result<usize, Error> {
    let new_transactions = fetch_seed_data(&state.http_client, &state.seed_url).await?;

    run_blocking(&state.db_connection, move |connection| {
        replace_product_transactions(&new_transactions, connection)
    })
    .await
}

/// Download and decode the feed at `url`.
///
/// # Errors
/// Returns [Error::SeedFetchError] if the request fails or the server does not
/// respond with a success status, or one of the errors from [parse_seed_data].
pub async fn fetch_seed_data(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<NewProductTransaction>, Error> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_seed_data(&body)
}

/// Decode the feed text into new product transactions.
///
/// # Errors
/// Returns [Error::InvalidSeedData] if `text` is not a JSON array, or
/// [Error::InvalidSeedRecord] for the first record that is missing a field or
/// has a field of the wrong type.
pub fn parse_seed_data(text: &str) -> Result<Vec<NewProductTransaction>, Error> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(text).map_err(|error| Error::InvalidSeedData(error.to_string()))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).map_err(|error| Error::InvalidSeedRecord {
                index,
                reason: error.to_string(),
            })
        })
        .collect()
}

/// Replace every product transaction with `new_transactions`.
///
/// The delete and inserts run in one SQL transaction, so readers see either
/// the old data or the new data and a failed insert leaves the old data in place.
/// Returns the number of inserted records.
///
/// # Errors
/// Returns [Error::SqlError] if any statement fails.
pub fn replace_product_transactions(
    new_transactions: &[NewProductTransaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let transaction = connection.unchecked_transaction()?;

    let deleted = delete_all_product_transactions(&transaction)?;
    let inserted = insert_product_transactions(new_transactions, &transaction)?;

    transaction.commit()?;

    tracing::debug!("Replaced {deleted} product transactions with {inserted} new ones");

    Ok(inserted)
}

#[cfg(test)]
mod seed_data_tests {
    use time::macros::datetime;

    use crate::{Error, product::ProductTransaction};

    use super::parse_seed_data;

    #[test]
    fn parses_feed_records() {
        let text = r#"[{
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 329.85,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://example.com/backpack.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        }]"#;

        let got = parse_seed_data(text).unwrap();

        assert_eq!(
            got,
            [ProductTransaction::build(
                "Fjallraven Backpack",
                329.85,
                datetime!(2021-11-27 20:29:54 +05:30)
            )
            .description("Your perfect pack for everyday use")
            .category("men's clothing")
            .sold(false)]
        );
    }

    #[test]
    fn empty_feed_has_no_records() {
        assert_eq!(parse_seed_data("[]"), Ok(vec![]));
    }

    #[test]
    fn rejects_non_array_feed() {
        let got = parse_seed_data(r#"{"title": "not a list"}"#);

        assert!(
            matches!(got, Err(Error::InvalidSeedData(_))),
            "expected InvalidSeedData, got {got:?}"
        );
    }

    #[test]
    fn reports_index_of_bad_record() {
        let text = r#"[
            {"title": "ok", "price": 1.0, "dateOfSale": "2022-01-01T00:00:00Z"},
            {"title": "no price", "dateOfSale": "2022-01-01T00:00:00Z"}
        ]"#;

        let got = parse_seed_data(text);

        assert!(
            matches!(got, Err(Error::InvalidSeedRecord { index: 1, .. })),
            "expected InvalidSeedRecord at index 1, got {got:?}"
        );
    }
}
