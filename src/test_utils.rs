use std::sync::{Arc, Mutex};

use axum::{body::Body, response::Response};
use rusqlite::Connection;
use scraper::Html;
use time::OffsetDateTime;

use crate::{
    db::initialize,
    pagination::PaginationConfig,
    product::{ProductState, ProductTransaction, create_product_transaction},
};

pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

pub(crate) fn product_state(conn: Connection) -> ProductState {
    ProductState {
        db_connection: Arc::new(Mutex::new(conn)),
        pagination_config: PaginationConfig::default(),
    }
}

/// Insert a product transaction with the fields the reports look at.
#[track_caller]
pub(crate) fn insert_sale(
    conn: &Connection,
    price: f64,
    date_of_sale: OffsetDateTime,
    category: &str,
    sold: bool,
) -> ProductTransaction {
    create_product_transaction(
        &ProductTransaction::build(&format!("{category} item"), price, date_of_sale)
            .category(category)
            .sold(sold),
        conn,
    )
    .expect("Could not create product transaction")
}

pub(crate) async fn parse_html(response: Response<Body>) -> Html {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&body).to_string();

    Html::parse_document(&text)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}
