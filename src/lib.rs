//! Product dashboard is a small web app for exploring a catalogue of product
//! transactions.
//!
//! This library provides a JSON API with per-month statistics, price range
//! histograms and category breakdowns, plus a server-rendered dashboard page
//! that draws the same data as tables and charts.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod error;
mod html;
mod logging;
mod month;
mod not_found;
mod pagination;
mod product;
mod routing;
mod seed;
mod statistics;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use product::{NewProductTransaction, ProductTransaction, count_product_transactions};
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, parse_seed_data, replace_product_transactions};
pub use statistics::{CategoryCount, CombinedData, MonthStatistics, PriceRangeCount};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
