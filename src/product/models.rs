//! Defines the core data model and database queries for product transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::Error;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// A product listed for sale, and whether it was sold.
///
/// To create a new `ProductTransaction`, use [ProductTransaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTransaction {
    /// The ID of the record.
    pub id: DatabaseId,
    /// The name of the product.
    pub title: String,
    /// A longer text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// When the product was sold, or listed for sale if it has not sold.
    ///
    /// Stored and returned in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// Whether the product was sold.
    pub sold: bool,
}

impl ProductTransaction {
    /// Create a new product transaction.
    ///
    /// Shortcut for [NewProductTransaction] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> NewProductTransaction {
        NewProductTransaction {
            title: title.to_owned(),
            description: String::new(),
            price,
            date_of_sale,
            category: String::new(),
            sold: false,
        }
    }
}

/// A product transaction that has not been saved to the database yet.
///
/// This is also the shape of the records in the seed feed, so it can be
/// deserialized directly from it. Fields in the feed that are not listed here,
/// such as `id` and `image`, are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductTransaction {
    /// The name of the product.
    pub title: String,
    /// A longer text description of the product.
    #[serde(default)]
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// When the product was sold. Any offset is accepted and converted to UTC on insert.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// The product category.
    #[serde(default)]
    pub category: String,
    /// Whether the product was sold.
    #[serde(default)]
    pub sold: bool,
}

impl NewProductTransaction {
    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the product transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_product_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product_transaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                date_of_sale TEXT NOT NULL,
                sale_month INTEGER NOT NULL CHECK (sale_month BETWEEN 1 AND 12),
                category TEXT NOT NULL,
                sold INTEGER NOT NULL
                )",
        (),
    )?;

    // Every report filters on the month of sale.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_product_transaction_sale_month
            ON product_transaction(sale_month);",
        (),
    )?;

    Ok(())
}

/// Save a new product transaction to the database.
///
/// The sale date is converted to UTC and its month is stored alongside it.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_product_transaction(
    new_transaction: &NewProductTransaction,
    connection: &Connection,
) -> Result<ProductTransaction, Error> {
    let date_of_sale = new_transaction.date_of_sale.to_offset(UtcOffset::UTC);
    let sale_month = date_of_sale.month() as u8;

    let transaction = connection
        .prepare_cached(
            "INSERT INTO product_transaction
                (title, description, price, date_of_sale, sale_month, category, sold)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, title, description, price, date_of_sale, category, sold",
        )?
        .query_row(
            (
                &new_transaction.title,
                &new_transaction.description,
                new_transaction.price,
                date_of_sale,
                sale_month,
                &new_transaction.category,
                new_transaction.sold,
            ),
            map_product_transaction_row,
        )?;

    Ok(transaction)
}

/// Save many product transactions, returning how many were saved.
///
/// The inserts run inside a savepoint, so either every record is saved or
/// none are. Savepoints nest, so this may be called inside an open transaction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn insert_product_transactions(
    new_transactions: &[NewProductTransaction],
    connection: &Connection,
) -> Result<usize, Error> {
    connection.execute_batch("SAVEPOINT insert_product_transactions")?;

    let result = new_transactions
        .iter()
        .try_for_each(|new_transaction| {
            create_product_transaction(new_transaction, connection).map(|_| ())
        });

    match result {
        Ok(()) => {
            connection.execute_batch("RELEASE insert_product_transactions")?;
            Ok(new_transactions.len())
        }
        Err(error) => {
            connection.execute_batch(
                "ROLLBACK TO insert_product_transactions; RELEASE insert_product_transactions",
            )?;
            Err(error)
        }
    }
}

/// Delete every product transaction and reset the ID sequence.
///
/// Returns the number of deleted rows.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_all_product_transactions(connection: &Connection) -> Result<usize, Error> {
    let deleted = connection.execute("DELETE FROM product_transaction", ())?;

    connection.execute(
        "DELETE FROM sqlite_sequence WHERE name = 'product_transaction'",
        (),
    )?;

    Ok(deleted)
}

/// Get the total number of product transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_product_transactions(connection: &Connection) -> Result<u64, Error> {
    let count: i64 =
        connection.query_row("SELECT COUNT(id) FROM product_transaction;", [], |row| {
            row.get(0)
        })?;

    Ok(count as u64)
}

/// Map a database row to a [ProductTransaction].
///
/// The row must contain the columns id, title, description, price,
/// date_of_sale, category and sold, in that order.
pub fn map_product_transaction_row(row: &Row) -> Result<ProductTransaction, rusqlite::Error> {
    Ok(ProductTransaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        date_of_sale: row.get(4)?,
        category: row.get(5)?,
        sold: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
