//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of records per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may ask for.
    pub max_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
            max_pages: 5,
        }
    }
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// The one-based page number.
    pub page: u64,
    /// The number of records on each page.
    pub per_page: u64,
}

impl Pagination {
    /// Create a page request, filling in defaults from `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidPage] if `page` is zero, or
    /// [Error::InvalidPageSize] if `per_page` is zero or above the configured maximum.
    pub fn new(
        page: Option<u64>,
        per_page: Option<u64>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let page = page.unwrap_or(config.default_page);
        let per_page = per_page.unwrap_or(config.default_page_size);

        if page == 0 {
            return Err(Error::InvalidPage(page));
        }

        if per_page == 0 || per_page > config.max_page_size {
            return Err(Error::InvalidPageSize {
                got: per_page,
                max: config.max_page_size,
            });
        }

        Ok(Self { page, per_page })
    }

    /// The number of records to skip.
    pub fn offset(self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// The maximum number of records to return.
    pub fn limit(self) -> u64 {
        self.per_page
    }
}

/// The number of pages needed to show `total` records, `per_page` at a time.
///
/// There is always at least one page, even if it is empty.
pub fn page_count(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page.max(1)).max(1)
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// Build the page links shown under a table.
///
/// At most `max_pages` consecutive page numbers are shown, centred on the
/// current page where possible. The first and last pages are always
/// reachable, with an ellipsis standing in for skipped pages.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let half_window = max_pages / 2;

    let (window_start, window_end) = if page_count <= max_pages {
        (1, page_count)
    } else {
        let start = curr_page
            .saturating_sub(half_window)
            .clamp(1, page_count - max_pages + 1);
        (start, start + max_pages - 1)
    };

    let mut indicators = Vec::new();

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(curr_page - 1));
    }

    if window_start > 1 {
        indicators.push(PaginationIndicator::Page(1));
        indicators.push(PaginationIndicator::Ellipsis);
    }

    for page in window_start..=window_end {
        if page == curr_page {
            indicators.push(PaginationIndicator::CurrPage(page));
        } else {
            indicators.push(PaginationIndicator::Page(page));
        }
    }

    if window_end < page_count {
        indicators.push(PaginationIndicator::Ellipsis);
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
