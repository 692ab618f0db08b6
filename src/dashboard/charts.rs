//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations for a month of product data:
//! - **Price Range Chart**: Bar chart of how many products fall in each price range
//! - **Category Chart**: Pie chart of how many products are in each category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Orient, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::HeadElement,
    month::SaleMonth,
    statistics::{CategoryCount, PriceRangeCount},
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const chart = echarts.init(chartDom, darkModeMediaQuery.matches ? 'dark' : null);
                    chart.setOption({});
                    window.addEventListener('resize', () => chart.resize());
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Build the dashboard charts for `month`.
pub(super) fn build_dashboard_charts(
    month: SaleMonth,
    price_ranges: &[PriceRangeCount],
    categories: &[CategoryCount],
) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "price-range-chart",
            options: price_range_chart(month, price_ranges).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(month, categories).to_string(),
        },
    ]
}

fn price_range_chart(month: SaleMonth, price_ranges: &[PriceRangeCount]) -> Chart {
    let labels: Vec<String> = price_ranges.iter().map(|range| range.range.clone()).collect();
    let counts: Vec<f64> = price_ranges.iter().map(|range| range.count as f64).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Products by Price Range")
                .subtext(month.name()),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Products").data(counts))
}

fn category_chart(month: SaleMonth, categories: &[CategoryCount]) -> Chart {
    let data: Vec<(f64, &str)> = categories
        .iter()
        .map(|category| (category.count as f64, category.category.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Products by Category")
                .subtext(month.name()),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().orient(Orient::Vertical).left("left").top("middle"))
        .series(
            Pie::new()
                .name("Products")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::{
        month::SaleMonth,
        statistics::{CategoryCount, count_price_ranges},
    };

    use super::build_dashboard_charts;

    #[test]
    fn chart_options_contain_labels() {
        let price_ranges = count_price_ranges(&[50.0, 950.0]);
        let categories = [CategoryCount {
            category: "electronics".to_owned(),
            count: 2,
        }];

        let [price_chart, category_chart] =
            build_dashboard_charts(SaleMonth::from(Month::May), &price_ranges, &categories);

        assert_eq!(price_chart.id, "price-range-chart");
        assert!(price_chart.options.contains("901-above"));
        assert!(price_chart.options.contains("May"));
        assert_eq!(category_chart.id, "category-chart");
        assert!(category_chart.options.contains("electronics"));
    }
}
