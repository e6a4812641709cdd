//! Pagination math for list browsers.
//!
//! Out-of-range page numbers are clamped into `[1, total_pages]` before
//! the range query, never rejected; a zero-row listing still has one
//! (empty) page.

/// A clamped page window over a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number, already clamped.
    pub page: i64,
    /// Rows per page for this listing kind.
    pub page_size: i64,
    /// Total row count at query time.
    pub total: i64,
    /// Total pages, floored at 1 even when `total == 0`.
    pub total_pages: i64,
}

impl Page {
    /// Clamp a requested page into range for `total` rows.
    pub const fn clamped(requested: i64, page_size: i64, total: i64) -> Self {
        let total_pages = {
            let pages = total.div_euclid(page_size)
                + if total.rem_euclid(page_size) > 0 { 1 } else { 0 };
            if pages < 1 { 1 } else { pages }
        };
        let page = if requested < 1 {
            1
        } else if requested > total_pages {
            total_pages
        } else {
            requested
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }

    /// Offset for the range query: `(page - 1) * page_size`.
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// A "previous" affordance is present only off the first page.
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// A "next" affordance is present only off the last page.
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_has_one_page() {
        let p = Page::clamped(1, 10, 0);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset(), 0);
        assert!(!p.has_prev());
        assert!(!p.has_next());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(Page::clamped(1, 10, 10).total_pages, 1);
        assert_eq!(Page::clamped(1, 10, 11).total_pages, 2);
        assert_eq!(Page::clamped(1, 5, 23).total_pages, 5);
    }

    #[test]
    fn out_of_range_pages_clamp() {
        // totalPages + 5 clamps down to totalPages
        let p = Page::clamped(7, 10, 23);
        assert_eq!(p.page, 3);

        // zero and negative clamp up to 1
        assert_eq!(Page::clamped(0, 10, 23).page, 1);
        assert_eq!(Page::clamped(-4, 10, 23).page, 1);
    }

    #[test]
    fn offset_follows_clamped_page() {
        let p = Page::clamped(2, 5, 23);
        assert_eq!(p.offset(), 5);
        let p = Page::clamped(99, 5, 23);
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn nav_affordances_at_edges() {
        let first = Page::clamped(1, 10, 30);
        assert!(!first.has_prev());
        assert!(first.has_next());

        let middle = Page::clamped(2, 10, 30);
        assert!(middle.has_prev());
        assert!(middle.has_next());

        let last = Page::clamped(3, 10, 30);
        assert!(last.has_prev());
        assert!(!last.has_next());
    }
}
