//! Search and pagination queries for product transactions.

use rusqlite::{Connection, named_params};

use crate::{Error, month::SaleMonth, pagination::Pagination};

use super::models::{ProductTransaction, map_product_transaction_row};

const FILTER_CLAUSE: &str = "(:month IS NULL OR sale_month = :month) \
    AND (:search = '' \
        OR title LIKE :pattern ESCAPE '\\' \
        OR description LIKE :pattern ESCAPE '\\' \
        OR (:price IS NOT NULL AND price = :price))";

/// Which product transactions to include in a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Text to look for in the title or description. An empty string matches everything.
    ///
    /// If the text is a number, records with exactly that price also match.
    pub search: String,
    /// Only include sales from this calendar month, in any year.
    pub month: Option<SaleMonth>,
}

impl TransactionFilter {
    /// Create a filter, trimming surrounding whitespace from `search`.
    pub fn new(search: &str, month: Option<SaleMonth>) -> Self {
        Self {
            search: search.trim().to_owned(),
            month,
        }
    }

    /// The search text as a LIKE pattern, with wildcards in the text escaped.
    fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.search.len() + 2);
        escaped.push('%');

        for c in self.search.chars() {
            if matches!(c, '\\' | '%' | '_') {
                escaped.push('\\');
            }
            escaped.push(c);
        }

        escaped.push('%');
        escaped
    }

    fn price(&self) -> Option<f64> {
        self.search
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite())
    }
}

/// Get one page of product transactions matching `filter`, ordered by ID.
///
/// Title and description matching is case-insensitive for ASCII text.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_product_transactions(
    filter: &TransactionFilter,
    pagination: Pagination,
    connection: &Connection,
) -> Result<Vec<ProductTransaction>, Error> {
    let query = format!(
        "SELECT id, title, description, price, date_of_sale, category, sold \
        FROM product_transaction \
        WHERE {FILTER_CLAUSE} \
        ORDER BY id ASC \
        LIMIT :limit OFFSET :offset"
    );

    let limit = i64::try_from(pagination.limit()).unwrap_or(i64::MAX);
    let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);

    connection
        .prepare(&query)?
        .query_map(
            named_params! {
                ":month": filter.month.map(SaleMonth::number),
                ":search": filter.search,
                ":pattern": filter.like_pattern(),
                ":price": filter.price(),
                ":limit": limit,
                ":offset": offset,
            },
            map_product_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Count all product transactions matching `filter`, ignoring pagination.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_matching_product_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let query = format!("SELECT COUNT(id) FROM product_transaction WHERE {FILTER_CLAUSE}");

    let count: i64 = connection.prepare(&query)?.query_row(
        named_params! {
            ":month": filter.month.map(SaleMonth::number),
            ":search": filter.search,
            ":pattern": filter.like_pattern(),
            ":price": filter.price(),
        },
        |row| row.get(0),
    )?;

    Ok(count as u64)
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::datetime};

    use crate::{
        month::SaleMonth,
        pagination::Pagination,
        product::{ProductTransaction, create_product_transaction},
        test_utils::get_test_connection,
    };

    use super::{TransactionFilter, count_matching_product_transactions, get_product_transactions};

    fn page(page: u64, per_page: u64) -> Pagination {
        Pagination { page, per_page }
    }

    fn titles(transactions: &[ProductTransaction]) -> Vec<&str> {
        transactions
            .iter()
            .map(|transaction| transaction.title.as_str())
            .collect()
    }

    fn insert(conn: &rusqlite::Connection, title: &str, description: &str, price: f64) {
        create_product_transaction(
            &ProductTransaction::build(title, price, datetime!(2022-03-10 10:00:00 UTC))
                .description(description),
            conn,
        )
        .unwrap();
    }

    #[test]
    fn empty_search_matches_everything() {
        let conn = get_test_connection();
        insert(&conn, "Backpack", "", 10.0);
        insert(&conn, "Mug", "", 20.0);

        let got = get_product_transactions(&TransactionFilter::default(), page(1, 10), &conn)
            .unwrap();

        assert_eq!(titles(&got), ["Backpack", "Mug"]);
    }

    #[test]
    fn search_matches_title_or_description_ignoring_case() {
        let conn = get_test_connection();
        insert(&conn, "Silver Ring", "", 10.0);
        insert(&conn, "Mug", "Holds silver paint", 20.0);
        insert(&conn, "Jacket", "Warm", 30.0);

        let filter = TransactionFilter::new("SILVER", None);
        let got = get_product_transactions(&filter, page(1, 10), &conn).unwrap();

        assert_eq!(titles(&got), ["Silver Ring", "Mug"]);
        assert_eq!(count_matching_product_transactions(&filter, &conn), Ok(2));
    }

    #[test]
    fn numeric_search_matches_price() {
        let conn = get_test_connection();
        insert(&conn, "Backpack", "", 109.95);
        insert(&conn, "Mug", "", 15.0);

        let got =
            get_product_transactions(&TransactionFilter::new("109.95", None), page(1, 10), &conn)
                .unwrap();

        assert_eq!(titles(&got), ["Backpack"]);
    }

    #[test]
    fn wildcards_in_search_are_literal() {
        let conn = get_test_connection();
        insert(&conn, "100% cotton shirt", "", 10.0);
        insert(&conn, "1000 piece puzzle", "", 20.0);
        insert(&conn, "snake_case mug", "", 30.0);
        insert(&conn, "snakeXcase mug", "", 40.0);

        let percent =
            get_product_transactions(&TransactionFilter::new("100%", None), page(1, 10), &conn)
                .unwrap();
        let underscore =
            get_product_transactions(&TransactionFilter::new("snake_case", None), page(1, 10), &conn)
                .unwrap();

        assert_eq!(titles(&percent), ["100% cotton shirt"]);
        assert_eq!(titles(&underscore), ["snake_case mug"]);
    }

    #[test]
    fn month_filter_ignores_year() {
        let conn = get_test_connection();
        for (title, date) in [
            ("march 2021", datetime!(2021-03-31 23:59:59 UTC)),
            ("april 2021", datetime!(2021-04-01 00:00:00 UTC)),
            ("march 2022", datetime!(2022-03-01 00:00:00 UTC)),
        ] {
            create_product_transaction(&ProductTransaction::build(title, 1.0, date), &conn)
                .unwrap();
        }

        let filter = TransactionFilter::new("", Some(SaleMonth::from(Month::March)));
        let got = get_product_transactions(&filter, page(1, 10), &conn).unwrap();

        assert_eq!(titles(&got), ["march 2021", "march 2022"]);
    }

    #[test]
    fn pages_do_not_overlap() {
        let conn = get_test_connection();
        for i in 1..=25 {
            insert(&conn, &format!("product #{i}"), "", i as f64);
        }
        let filter = TransactionFilter::default();

        let first = get_product_transactions(&filter, page(1, 10), &conn).unwrap();
        let third = get_product_transactions(&filter, page(3, 10), &conn).unwrap();
        let fourth = get_product_transactions(&filter, page(4, 10), &conn).unwrap();

        assert_eq!(first.len(), 10);
        assert_eq!(first.first().map(|t| t.id), Some(1));
        assert_eq!(third.len(), 5);
        assert_eq!(third.first().map(|t| t.id), Some(21));
        assert!(fourth.is_empty());
        assert_eq!(count_matching_product_transactions(&filter, &conn), Ok(25));
    }
}
