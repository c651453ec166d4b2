//! Page slicing for listing views.
//!
//! The backend returns whole lists; listing pages show them a page at a
//! time. Page numbers are 1-based. Out-of-range requests are clamped to the
//! nearest valid page rather than rejected.

use serde::Deserialize;

/// Default number of items per page.
pub const DEFAULT_PER_PAGE: usize = 12;

/// Upper bound on items per page.
pub const MAX_PER_PAGE: usize = 100;

/// Pagination query parameters (`?page=2&per_page=20`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageRequest {
    /// The requested page, at least 1.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// The requested page size, between 1 and [`MAX_PER_PAGE`].
    #[must_use]
    pub fn per_page(&self, default: usize) -> usize {
        self.per_page.unwrap_or(default).clamp(1, MAX_PER_PAGE)
    }
}

/// One page of items plus the numbers needed to render pager links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `items` according to `request`.
    ///
    /// An empty list yields a single empty page 1.
    #[must_use]
    pub fn paginate(items: Vec<T>, request: PageRequest, default_per_page: usize) -> Self {
        let per_page = request.per_page(default_per_page);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(per_page).max(1);
        let page = request.page().min(total_pages);

        let start = (page - 1) * per_page;
        let items = items.into_iter().skip(start).take(per_page).collect();

        Self {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Previous page number (saturates at 1).
    #[must_use]
    pub const fn prev_page(&self) -> usize {
        if self.page > 1 { self.page - 1 } else { 1 }
    }

    /// Next page number (saturates at the last page).
    #[must_use]
    pub fn next_page(&self) -> usize {
        (self.page + 1).min(self.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: usize, per_page: usize) -> PageRequest {
        PageRequest {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    #[test]
    fn test_first_page() {
        let page = Page::paginate((1..=25).collect(), request(1, 10), DEFAULT_PER_PAGE);
        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_prev());
        assert!(page.has_next());
        assert_eq!(page.next_page(), 2);
    }

    #[test]
    fn test_last_partial_page() {
        let page = Page::paginate((1..=25).collect(), request(3, 10), DEFAULT_PER_PAGE);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert!(page.has_prev());
        assert!(!page.has_next());
        assert_eq!(page.prev_page(), 2);
    }

    #[test]
    fn test_prev_page_on_first_page_stays_at_one() {
        let page = Page::paginate((1..=5).collect(), request(1, 10), DEFAULT_PER_PAGE);
        assert_eq!(page.prev_page(), 1);

        let empty: Page<u8> = Page::paginate(Vec::new(), request(1, 10), DEFAULT_PER_PAGE);
        assert_eq!(empty.prev_page(), 1);
    }

    #[test]
    fn test_page_past_end_is_clamped() {
        let page = Page::paginate((1..=5).collect(), request(9, 2), DEFAULT_PER_PAGE);
        assert_eq!(page.page, 3);
        assert_eq!(page.items, vec![5]);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let page = Page::paginate((1..=5).collect(), request(0, 2), DEFAULT_PER_PAGE);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2]);
    }

    #[test]
    fn test_empty_list() {
        let page: Page<u8> = Page::paginate(Vec::new(), PageRequest::default(), 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_per_page_defaults_and_bounds() {
        assert_eq!(PageRequest::default().per_page(7), 7);
        assert_eq!(request(1, 0).per_page(7), 1);
        assert_eq!(request(1, 5000).per_page(7), MAX_PER_PAGE);
    }
}
