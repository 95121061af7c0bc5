//! Page state, page slicing and pagination metadata

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Number of pages needed for `len` items (0 for an empty list)
pub fn total_pages(len: usize, items_per_page: usize) -> usize {
    let per_page = items_per_page.max(1);
    if len == 0 { 0 } else { len.div_ceil(per_page) }
}

/// Current page and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// Page number (starts at 1)
    pub current_page: usize,

    /// Number of items per page
    pub items_per_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl PageState {
    /// First page with the given page size (minimum 1)
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    /// Start index of the current page
    pub fn offset(&self) -> usize {
        (self.current_page.max(1) - 1).saturating_mul(self.items_per_page.max(1))
    }

    /// Slice `items` down to the current page
    ///
    /// Never panics: an out-of-range page yields an empty slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.items_per_page.max(1)).min(items.len());
        &items[start..end]
    }

    /// Advance one page; no-op on the last page
    pub fn next(&mut self, total_pages: usize) -> bool {
        if self.current_page < total_pages {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; no-op on the first page
    pub fn previous(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, clamped to `[1, max(total_pages, 1)]`
    pub fn go_to(&mut self, page: usize, total_pages: usize) {
        self.current_page = page.clamp(1, total_pages.max(1));
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit and page are at least 1 to avoid division by zero and underflow
        let limit = limit.max(1);
        let page = page.max(1);
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}

impl Default for PaginationMeta {
    fn default() -> Self {
        Self::new(1, DEFAULT_ITEMS_PER_PAGE, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_slice_last_and_out_of_range_pages() {
        let items: Vec<usize> = (0..23).collect();
        let mut page = PageState::new(10);

        page.current_page = 3;
        assert_eq!(page.slice(&items), &[20, 21, 22]);

        page.current_page = 4;
        assert!(page.slice(&items).is_empty());

        page.current_page = usize::MAX;
        assert!(page.slice(&items).is_empty());
    }

    #[test]
    fn test_navigation_is_bounded() {
        let mut page = PageState::new(10);
        assert!(!page.previous());
        assert!(page.next(3));
        assert!(page.next(3));
        assert!(!page.next(3));
        assert_eq!(page.current_page, 3);

        page.go_to(99, 3);
        assert_eq!(page.current_page, 3);
        page.go_to(0, 3);
        assert_eq!(page.current_page, 1);
        page.go_to(5, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);

        let last = PaginationMeta::new(8, 20, 145);
        assert!(last.has_prev);
        assert!(!last.has_next);
    }

    #[test]
    fn test_pagination_meta_empty() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }
}
