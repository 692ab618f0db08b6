//! Monthly reports over product transactions.
//!
//! This module contains:
//! - Sale totals for a month
//! - A histogram of prices in ranges of 100
//! - The number of products in each category
//! - A combined endpoint that returns all of the above with a page of transactions

mod categories;
mod combined;
mod price_ranges;
mod summary;

pub use categories::{CategoryCount, get_category_counts, get_pie_chart_endpoint};
pub use combined::{CombinedData, get_combined_data_endpoint};
pub use price_ranges::{PriceRangeCount, get_bar_chart_endpoint, get_price_range_counts};
pub use summary::{MonthStatistics, get_month_statistics, get_statistics_endpoint};

#[cfg(test)]
pub(crate) use price_ranges::count_price_ranges;
