//! Dashboard HTTP handler and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - The query type used by the handler and its links

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    dashboard::{
        charts::{build_dashboard_charts, charts_script, charts_view},
        tables::{pagination_view, statistics_table, transactions_table},
    },
    db::run_blocking,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, ECHARTS_SCRIPT_URL, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, base, link,
    },
    month::{SaleMonth, parse_optional_month},
    pagination::{Pagination, create_pagination_indicators, page_count},
    product::{
        ProductState, ProductTransaction, TransactionFilter, count_matching_product_transactions,
        get_product_transactions,
    },
    statistics::{
        CategoryCount, MonthStatistics, PriceRangeCount, get_category_counts,
        get_month_statistics, get_price_range_counts,
    },
};

/// The query parameters for the dashboard page.
///
/// Also used to build the links between pages, so empty fields are left out
/// of the generated URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    /// The month to show, March if not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// The page of the transactions table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// Text to search the transactions for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl DashboardQuery {
    /// The dashboard URL with this query.
    pub(crate) fn to_url(&self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query) if query.is_empty() => endpoints::DASHBOARD_VIEW.to_owned(),
            Ok(query) => format!("{}?{query}", endpoints::DASHBOARD_VIEW),
            Err(error) => {
                tracing::warn!("could not encode dashboard query {self:?}: {error}");
                endpoints::DASHBOARD_VIEW.to_owned()
            }
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    transactions: Vec<ProductTransaction>,
    matching_count: u64,
    statistics: MonthStatistics,
    price_ranges: Vec<PriceRangeCount>,
    categories: Vec<CategoryCount>,
}

/// Display the tables and charts for a month.
pub async fn get_dashboard_page(
    State(state): State<ProductState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(query) = query?;
    let month = parse_optional_month(query.month.as_deref())?.unwrap_or_default();
    let pagination = Pagination::new(query.page, None, &state.pagination_config)?;
    let search = query.search.clone().unwrap_or_default();
    let filter = TransactionFilter::new(&search, Some(month));

    let data = run_blocking(&state.db_connection, move |connection| {
        build_dashboard_data(&filter, month, pagination, connection)
    })
    .await
    .inspect_err(|error| tracing::error!("could not build dashboard data: {error}"))?;

    let page_count = page_count(data.matching_count, pagination.per_page);
    let indicators = create_pagination_indicators(
        pagination.page,
        page_count,
        state.pagination_config.max_pages,
    );

    let page_url = |page: u64| {
        DashboardQuery {
            month: Some(month.name().to_owned()),
            page: Some(page),
            search: Some(search.clone()).filter(|search| !search.is_empty()),
        }
        .to_url()
    };
    let pagination = pagination_view(&indicators, page_url);

    Ok(dashboard_view(month, &search, &data, &pagination).into_response())
}

/// Fetches the page of transactions and the reports for `month`.
///
/// # Errors
/// Returns error if any of the database queries fail.
fn build_dashboard_data(
    filter: &TransactionFilter,
    month: SaleMonth,
    pagination: Pagination,
    connection: &Connection,
) -> Result<DashboardData, Error> {
    Ok(DashboardData {
        transactions: get_product_transactions(filter, pagination, connection)?,
        matching_count: count_matching_product_transactions(filter, connection)?,
        statistics: get_month_statistics(month, connection)?,
        price_ranges: get_price_range_counts(month, connection)?,
        categories: get_category_counts(month, connection)?,
    })
}

fn month_search_form(month: SaleMonth, search: &str) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="flex flex-col md:flex-row items-end gap-4 w-full mb-6"
        {
            div class="w-full md:w-1/3" {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }
                select id="month" name="month" class=(FORM_TEXT_INPUT_STYLE) {
                    @for option in SaleMonth::all() {
                        option value=(option.name()) selected[option == month] { (option.name()) }
                    }
                }
            }

            div class="w-full md:w-1/2" {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    id="search"
                    name="search"
                    placeholder="Title, description or price"
                    value=(search)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Show" }
        }
    }
}

fn dashboard_view(
    month: SaleMonth,
    search: &str,
    data: &DashboardData,
    pagination: &Markup,
) -> Markup {
    let charts = build_dashboard_charts(month, &data.price_ranges, &data.categories);
    let clear_search_link = DashboardQuery {
        month: Some(month.name().to_owned()),
        ..Default::default()
    }
    .to_url();

    let content = html!(
        div
            id="dashboard-content"
            class={(PAGE_CONTAINER_STYLE) " max-w-screen-xl"}
        {
            h1 class="text-2xl font-bold mb-6" { "Transaction Dashboard" }

            (month_search_form(month, search))

            section id="transactions" class="w-full mb-8" {
                h3 class="text-xl font-semibold mb-4" { "Transactions - " (month.name()) }

                @if !search.is_empty() {
                    p class="mb-2" {
                        (data.matching_count) " results for \"" (search) "\". "
                        (link(&clear_search_link, "Clear search"))
                    }
                }

                (transactions_table(&data.transactions))
                (pagination)
            }

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full mb-8" {
                (statistics_table(month, &data.statistics))
            }

            (charts_view(&charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}
