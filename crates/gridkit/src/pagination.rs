//! Pagination window calculation and page navigation.
//!
//! Pages are zero-based. A [`Pagination`] of `{ page, items_per_page }`
//! selects `[page * items_per_page, page * items_per_page + items_per_page)`,
//! clamped to the set. Without a pagination every row is on one page.
//!
//! Requests for a page past the end are not clamped here: they produce an
//! empty window. Keeping the page in range when the page size changes is
//! up to the caller.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Page sizes offered when the caller does not configure any.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 3] = [10, 50, 100];

/// Number of page links shown before navigation arrows appear.
pub const DEFAULT_MAX_PAGE_LINKS: usize = 6;

/// A page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based page index.
    pub page: usize,
    /// Rows per page. Zero disables slicing.
    pub items_per_page: usize,
}

impl Pagination {
    /// Page `page` of `items_per_page` rows.
    pub fn new(page: usize, items_per_page: usize) -> Self {
        Pagination {
            page,
            items_per_page,
        }
    }

    /// The first page for a given page size.
    pub fn first(items_per_page: usize) -> Self {
        Pagination::new(0, items_per_page)
    }

    /// Same page size, different page.
    pub fn with_page(self, page: usize) -> Self {
        Pagination { page, ..self }
    }

    /// Row index range of this page within a set of `total` rows.
    pub fn range(&self, total: usize) -> Range<usize> {
        if self.items_per_page == 0 {
            return 0..total;
        }
        let start = self.page.saturating_mul(self.items_per_page).min(total);
        let end = start.saturating_add(self.items_per_page).min(total);
        start..end
    }
}

/// Row index range selected by `pagination`, or `0..total` when absent.
pub fn page_range(pagination: Option<&Pagination>, total: usize) -> Range<usize> {
    pagination.map_or(0..total, |p| p.range(total))
}

/// Where a page sits within the full result set.
///
/// `start` and `end` are one-based row positions for display; both are
/// zero when the page holds no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub page: usize,
    pub items_per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

impl PageSummary {
    /// Summarizes page `page` of `items_per_page` rows within `total` rows.
    pub fn new(page: usize, items_per_page: usize, total: usize) -> Self {
        let range = Pagination::new(page, items_per_page).range(total);
        let total_pages = match (total, items_per_page) {
            (0, _) => 0,
            (_, 0) => 1,
            (total, n) => total.div_ceil(n),
        };
        let (start, end) = if range.is_empty() {
            (0, 0)
        } else {
            (range.start + 1, range.end)
        };

        PageSummary {
            page,
            items_per_page,
            total,
            total_pages,
            start,
            end,
        }
    }

    /// Summary for a pagination request over `total` rows.
    pub fn for_pagination(pagination: &Pagination, total: usize) -> Self {
        PageSummary::new(pagination.page, pagination.items_per_page, total)
    }

    /// `"Showing X to Y of N records"`.
    pub fn message(&self) -> String {
        format!("Showing {} to {} of {} records", self.start, self.end, self.total)
    }

    /// Returns `true` if there is a page before this one.
    pub fn has_previous(&self) -> bool {
        self.page > 0 && self.total_pages > 0
    }

    /// Returns `true` if there is a page after this one.
    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    /// Page to go to from a "previous" control. Stays on the first page.
    pub fn previous_page(&self) -> usize {
        self.page.saturating_sub(1).min(self.last_page())
    }

    /// Page to go to from a "next" control. Stays on the last page.
    pub fn next_page(&self) -> usize {
        self.page.saturating_add(1).min(self.last_page())
    }

    /// Index of the last page, zero for an empty set.
    pub fn last_page(&self) -> usize {
        self.total_pages.saturating_sub(1)
    }

    /// Zero-based pages to offer as direct links, at most `max` of them.
    ///
    /// The window slides to keep the current page visible, starting as
    /// close to the current page's left as the end of the set allows.
    pub fn visible_page_links(&self, max: usize) -> Vec<usize> {
        if max == 0 || self.total_pages == 0 {
            return Vec::new();
        }
        if self.total_pages <= max {
            return (0..self.total_pages).collect();
        }

        let current = self.page.min(self.last_page());
        let first = current
            .saturating_sub(max / 2)
            .min(self.total_pages - max);
        (first..first + max).collect()
    }

    /// Whether previous/next arrows are needed because not every page fits
    /// in `max` links.
    pub fn needs_arrows(&self, max: usize) -> bool {
        self.total_pages > max
    }
}

/// Page sizes to offer in a page-size selector.
///
/// The current size is listed first when it is smaller than every default,
/// so a table configured with a small page size can return to it.
pub fn page_size_options(current: usize, defaults: &[usize]) -> Vec<usize> {
    let mut options = Vec::with_capacity(defaults.len() + 1);
    if current > 0 && defaults.iter().all(|&d| current < d) {
        options.push(current);
    }
    options.extend_from_slice(defaults);
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_selects_page_window() {
        assert_eq!(Pagination::new(0, 2).range(7), 0..2);
        assert_eq!(Pagination::new(1, 2).range(7), 2..4);
        assert_eq!(Pagination::new(3, 2).range(7), 6..7);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        assert!(Pagination::new(4, 2).range(7).is_empty());
        assert!(Pagination::new(usize::MAX, usize::MAX).range(7).is_empty());
    }

    #[test]
    fn absent_or_zero_sized_pagination_covers_everything() {
        assert_eq!(page_range(None, 5), 0..5);
        assert_eq!(page_range(Some(&Pagination::new(3, 0)), 5), 0..5);
    }

    #[test]
    fn summary_counts_pages() {
        assert_eq!(PageSummary::new(0, 2, 7).total_pages, 4);
        assert_eq!(PageSummary::new(0, 10, 10).total_pages, 1);
        assert_eq!(PageSummary::new(0, 10, 0).total_pages, 0);
        assert_eq!(PageSummary::new(0, 0, 3).total_pages, 1);
    }

    #[test]
    fn summary_message() {
        assert_eq!(PageSummary::new(0, 2, 7).message(), "Showing 1 to 2 of 7 records");
        assert_eq!(PageSummary::new(3, 2, 7).message(), "Showing 7 to 7 of 7 records");
        assert_eq!(PageSummary::new(0, 10, 0).message(), "Showing 0 to 0 of 0 records");
        assert_eq!(PageSummary::new(9, 2, 7).message(), "Showing 0 to 0 of 7 records");
    }

    #[test]
    fn navigation_is_clamped() {
        let first = PageSummary::new(0, 2, 7);
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert_eq!(first.previous_page(), 0);
        assert_eq!(first.next_page(), 1);

        let last = PageSummary::new(3, 2, 7);
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert_eq!(last.next_page(), 3);
        assert_eq!(last.previous_page(), 2);

        let empty = PageSummary::new(0, 2, 0);
        assert_eq!(empty.next_page(), 0);
        assert!(!empty.has_next());
    }

    #[test]
    fn navigation_far_past_the_end_does_not_overflow() {
        let summary = PageSummary::new(usize::MAX, 10, 5);
        assert!(!summary.has_next());
        assert!(summary.has_previous());
        assert_eq!(summary.next_page(), 0);
        assert_eq!(summary.previous_page(), 0);
        assert_eq!(summary.message(), "Showing 0 to 0 of 5 records");
    }

    #[test]
    fn all_links_shown_when_they_fit() {
        assert_eq!(PageSummary::new(0, 2, 7).visible_page_links(6), vec![0, 1, 2, 3]);
        assert!(!PageSummary::new(0, 2, 7).needs_arrows(6));
        assert!(PageSummary::new(0, 10, 0).visible_page_links(6).is_empty());
    }

    #[test]
    fn link_window_slides_with_current_page() {
        // 20 pages
        let links = |page| PageSummary::new(page, 1, 20).visible_page_links(6);
        assert_eq!(links(0), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(links(10), vec![7, 8, 9, 10, 11, 12]);
        assert_eq!(links(19), vec![14, 15, 16, 17, 18, 19]);
        assert!(PageSummary::new(0, 1, 20).needs_arrows(6));
    }

    #[test]
    fn small_current_size_is_offered() {
        assert_eq!(page_size_options(2, &DEFAULT_PAGE_SIZE_OPTIONS), vec![2, 10, 50, 100]);
        assert_eq!(page_size_options(10, &DEFAULT_PAGE_SIZE_OPTIONS), vec![10, 50, 100]);
        assert_eq!(page_size_options(25, &DEFAULT_PAGE_SIZE_OPTIONS), vec![10, 50, 100]);
        assert_eq!(page_size_options(0, &DEFAULT_PAGE_SIZE_OPTIONS), vec![10, 50, 100]);
    }
}
