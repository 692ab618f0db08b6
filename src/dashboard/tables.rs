//! Table views for dashboard data display.

use maud::{Markup, html};
use time::format_description::well_known::Rfc3339;

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    month::SaleMonth,
    pagination::PaginationIndicator,
    product::ProductTransaction,
    statistics::MonthStatistics,
};

const PAGE_LINK_STYLE: &str = "block px-3 py-2 rounded-sm text-blue-600 hover:underline";
const CURRENT_PAGE_STYLE: &str = "block px-3 py-2 rounded-sm font-bold text-black dark:text-white";
const DESCRIPTION_MAX_CHARS: usize = 60;

/// Renders the sale totals for a month.
pub(super) fn statistics_table(month: SaleMonth, statistics: &MonthStatistics) -> Markup {
    html! {
        div id="statistics" {
            h3 class="text-xl font-semibold mb-4" { "Statistics - " (month.name()) }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    tbody {
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total sale" }
                            td class=(TABLE_CELL_STYLE) { (format_currency(statistics.total_sale_amount)) }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total sold items" }
                            td class=(TABLE_CELL_STYLE) { (statistics.total_sold_items) }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total not sold items" }
                            td class=(TABLE_CELL_STYLE) { (statistics.total_not_sold_items) }
                        }
                    }
                }
            }
        }
    }
}

/// Renders a page of product transactions, or a message when there are none.
pub(super) fn transactions_table(transactions: &[ProductTransaction]) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow w-full" {
            table
                id="transactions-table"
                class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE) {
                    tr {
                        @for heading in ["ID", "Title", "Description", "Price", "Category", "Sold", "Date of Sale"] {
                            th scope="col" class=(TABLE_CELL_STYLE) { (heading) }
                        }
                    }
                }
                tbody {
                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE) {
                            td colspan="7" class={(TABLE_CELL_STYLE) " text-center"} {
                                "No transactions found"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &ProductTransaction) -> Markup {
    let (description, tooltip) = truncate_description(&transaction.description);
    let date = transaction
        .date_of_sale
        .format(&Rfc3339)
        .unwrap_or_else(|_| transaction.date_of_sale.date().to_string());

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true" {
            td class=(TABLE_CELL_STYLE) { (transaction.id) }
            td class=(TABLE_CELL_STYLE) { (transaction.title) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(transaction.price)) }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class=(TABLE_CELL_STYLE) { @if transaction.sold { "Yes" } @else { "No" } }
            td class=(TABLE_CELL_STYLE) {
                time datetime=(date) { (transaction.date_of_sale.date()) }
            }
        }
    }
}

/// Shorten long descriptions, returning the full text as a tooltip when cut.
fn truncate_description(description: &str) -> (String, Option<&str>) {
    if description.chars().count() <= DESCRIPTION_MAX_CHARS {
        return (description.to_owned(), None);
    }

    let truncated: String = description.chars().take(DESCRIPTION_MAX_CHARS).collect();

    (format!("{}...", truncated.trim_end()), Some(description))
}

/// Renders page links under the transactions table.
///
/// `page_url` maps a page number to the URL for that page.
pub(super) fn pagination_view(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    html! {
        nav class="pagination flex justify-center" {
            ul class="pagination flex items-center gap-x-2 p-0 m-0" {
                @for indicator in indicators {
                    li {
                        @match indicator {
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) role="button" class=(PAGE_LINK_STYLE) { "Back" }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(PAGE_LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class=(CURRENT_PAGE_STYLE) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="px-2 text-gray-500" { "..." }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) role="button" class=(PAGE_LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}
