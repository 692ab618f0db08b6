//! Dashboard module
//!
//! Provides a page showing a month of product transactions with its
//! statistics and charts. Includes a search box and month selector.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
