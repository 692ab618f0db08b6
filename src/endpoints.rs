//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page that shows the tables and charts for a month.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The route that replaces the database contents with the seed data.
pub const INITIALIZE: &str = "/initialize";
/// The route to list and search product transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the sale totals of a month.
pub const STATISTICS: &str = "/statistics";
/// The route for the price range histogram of a month.
pub const BAR_CHART: &str = "/bar-chart";
/// The route for the category counts of a month.
pub const PIE_CHART: &str = "/pie-chart";
/// The route that returns transactions and all reports for a month in one response.
pub const COMBINED_DATA: &str = "/combined-data";
