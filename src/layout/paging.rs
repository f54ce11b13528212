//! Paging of window sets too large to stack at once.

use std::ops::Range;

/// Position within a sequence split into consecutive pages.
///
/// A sequence always has at least one page, possibly empty. Moving past
/// either end is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    index: usize,
    count: usize,
    page_size: usize,
    total: usize,
}

impl Pager {
    /// Pager over `total` items, on page `index` (clamped to the last page).
    #[must_use]
    pub fn new(total: usize, page_size: usize, index: usize) -> Self {
        let page_size = page_size.max(1);
        let count = ((total + page_size - 1) / page_size).max(1);

        Self {
            index: index.min(count - 1),
            count,
            page_size,
            total,
        }
    }

    /// Current page, from zero.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of pages.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.index + 1 < self.count
    }

    /// Move to the next page. Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous page. Returns whether the page changed.
    pub fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Item indices on the current page.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        let start = (self.index * self.page_size).min(self.total);
        start..(start + self.page_size).min(self.total)
    }

    /// The current page's share of `items`.
    #[must_use]
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sets_are_a_single_page() {
        let pager = Pager::new(5, 8, 0);
        assert_eq!(pager.count(), 1);
        assert!(!pager.has_prev());
        assert!(!pager.has_next());
        assert_eq!(pager.range(), 0..5);

        assert_eq!(Pager::new(0, 8, 3).count(), 1);
    }

    #[test]
    fn large_sets_split_into_consecutive_pages() {
        let items: Vec<usize> = (0..19).collect();
        let mut pager = Pager::new(items.len(), 8, 0);
        assert_eq!(pager.count(), 3);

        let mut seen = Vec::new();
        loop {
            let page = pager.page(&items);
            assert!(page.len() <= 8);
            seen.extend_from_slice(page);
            if !pager.next() {
                break;
            }
        }
        assert_eq!(seen, items);
        assert_eq!(pager.page(&items), &[16, 17, 18]);
    }

    #[test]
    fn exact_multiples_have_full_last_pages() {
        let pager = Pager::new(16, 8, 1);
        assert_eq!(pager.count(), 2);
        assert_eq!(pager.range(), 8..16);
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        let mut pager = Pager::new(17, 8, 0);
        assert!(!pager.has_prev());
        assert!(!pager.prev());
        assert_eq!(pager.index(), 0);

        assert!(pager.next());
        assert!(pager.next());
        assert!(!pager.has_next());
        assert!(!pager.next());
        assert_eq!(pager.index(), 2);
        assert!(pager.has_prev());
    }

    #[test]
    fn out_of_range_pages_clamp_to_the_last() {
        let pager = Pager::new(20, 8, 10);
        assert_eq!(pager.index(), 2);
        assert_eq!(pager.range(), 16..20);
    }
}
