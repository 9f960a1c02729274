//! Pagination windows and page metadata.
//!
//! A `Pagination` is the raw limit/offset window applied to a criteria.
//! `PageRequest` is the page-number view used by callers that think in
//! pages; it normalises out-of-range input instead of rejecting it.

use serde::Serialize;

/// Default page size when none (or an invalid one) is requested
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest page size a `PageRequest` will produce
pub const MAX_PAGE_SIZE: u64 = 100;

/// Limit/offset window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Pagination {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Page metadata for this window over `total_items` records
    pub fn page_info(&self, total_items: u64) -> PageInfo {
        let page = if self.limit == 0 {
            1
        } else {
            self.offset / self.limit + 1
        };
        PageInfo::new(page, self.limit, total_items)
    }
}

/// Page-number request (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Normalise a page request: `page < 1` becomes 1, `page_size < 1`
    /// becomes the default, and `page_size` is capped at `MAX_PAGE_SIZE`.
    pub fn new(page: i64, page_size: i64) -> Self {
        let page = if page < 1 { 1 } else { page as u64 };
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            (page_size as u64).min(MAX_PAGE_SIZE)
        };
        Self { page, page_size }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE as i64)
    }
}

impl From<PageRequest> for Pagination {
    fn from(request: PageRequest) -> Self {
        Pagination::new(request.limit(), request.offset())
    }
}

/// Page metadata returned next to a page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    pub fn new(current_page: u64, page_size: u64, total_items: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_items.div_ceil(page_size)
        };
        Self {
            current_page,
            page_size,
            total_items,
            total_pages,
            has_next: current_page < total_pages,
            has_previous: current_page > 1,
        }
    }
}

/// A page of items with its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, pagination: PageInfo) -> Self {
        Self { items, pagination }
    }
}
