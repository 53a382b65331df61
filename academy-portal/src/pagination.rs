//! Page arithmetic for admin listings

use academy_common::api::types::Page;

/// Rows per page for admin listings
pub const PAGE_SIZE: i64 = 100;

/// One page window over `total` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-indexed, clamped into `[1, total_pages]`
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Window of `PAGE_SIZE` rows
    ///
    /// ```
    /// use academy_portal::pagination::Pagination;
    ///
    /// let p = Pagination::new(250, 99);
    /// assert_eq!((p.page, p.total_pages, p.offset()), (3, 3, 200));
    /// ```
    pub fn new(total: i64, requested_page: i64) -> Self {
        Self::with_page_size(total, requested_page, PAGE_SIZE)
    }

    pub fn with_page_size(total: i64, requested_page: i64, page_size: i64) -> Self {
        let page_size = page_size.max(1);
        let total = total.max(0);
        let total_pages = (total + page_size - 1) / page_size;
        let page = requested_page.clamp(1, total_pages.max(1));

        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }

    /// Rows to skip for `LIMIT ? OFFSET ?`
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Wrap the rows fetched for this window
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}
