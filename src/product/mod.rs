//! Product transactions, the single record type behind every report.
//!
//! This module contains:
//! - The `ProductTransaction` model and `NewProductTransaction` for creating records
//! - Database functions for storing, searching and paging records
//! - The JSON endpoint that lists records

mod list_endpoint;
mod models;
mod query;

pub use list_endpoint::{
    ProductState, TransactionsQuery, get_transactions_endpoint, list_product_transactions,
};
pub use models::{
    NewProductTransaction, ProductTransaction, count_product_transactions,
    create_product_transaction_table, delete_all_product_transactions, insert_product_transactions,
};
pub use query::{TransactionFilter, count_matching_product_transactions, get_product_transactions};

#[cfg(test)]
pub(crate) use models::create_product_transaction;
