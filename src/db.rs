//! Database setup and helpers for running queries off the async runtime.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, product::create_product_transaction_table};

/// Create all of the database tables for the application.
///
/// # Errors
/// This function may return an [Error::SqlError] if an SQL error occurred.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_product_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Run `query` against the shared connection on the blocking thread pool.
///
/// SQLite calls block, so handlers go through this function rather than
/// locking the connection on an async worker thread.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned,
/// [Error::TaskError] if the blocking task fails to complete,
/// or whatever error `query` returns.
pub(crate) async fn run_blocking<T, F>(
    db_connection: &Arc<Mutex<Connection>>,
    query: F,
) -> Result<T, Error>
where
    F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    let db_connection = Arc::clone(db_connection);

    tokio::task::spawn_blocking(move || {
        let connection = db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        query(&connection)
    })
    .await?
}
