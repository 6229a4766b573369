//! Fixed-size pagination over ordered result collections.
//!
//! `Paginator` only tracks the page index and size; `PaginatedResultSet`
//! owns the collection as well and keeps the index clamped whenever the
//! collection changes. Page contents are always sliced on demand so that a
//! view never shows items that were removed after it was built.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Number of pages needed to show `len` items.
///
/// An empty collection still has one (empty) page. A page size of zero is
/// treated as one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Display summary of the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Zero-based index of the current page.
    pub current: usize,
    /// Total number of pages (at least 1).
    pub total_pages: usize,
    /// Total number of items across all pages.
    pub total_items: usize,
    /// Item indices shown on the current page.
    pub range: Range<usize>,
}

impl PageInfo {
    /// Human-readable position, e.g. `Page 2/5`.
    pub fn label(&self) -> String {
        format!("Page {}/{}", self.current + 1, self.total_pages)
    }

    /// Check whether the current page has no items.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Page index and size, clamped against a collection length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginator {
    page_size: usize,
    current: usize,
}

impl Paginator {
    /// Create a paginator positioned on the first page.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 0,
        }
    }

    /// Items per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based index of the current page.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Total pages for a collection of `len` items.
    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }

    /// Pull the current page back into `[0, total_pages - 1]`.
    pub fn clamp(&mut self, len: usize) {
        self.current = self.current.min(self.total_pages(len) - 1);
    }

    /// Jump to a page, clamped to the valid range.
    pub fn set_page(&mut self, page: usize, len: usize) {
        self.current = page;
        self.clamp(len);
    }

    /// Advance one page. Returns `false` when already on the last page.
    pub fn next(&mut self, len: usize) -> bool {
        if self.current + 1 < self.total_pages(len) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns `false` when already on the first page.
    pub fn prev(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to the first page.
    pub fn first(&mut self) {
        self.current = 0;
    }

    /// Jump to the last page.
    pub fn last(&mut self, len: usize) {
        self.current = self.total_pages(len) - 1;
    }

    /// Item index range of the current page for a collection of `len` items.
    pub fn range(&self, len: usize) -> Range<usize> {
        let current = self.current.min(self.total_pages(len) - 1);
        let start = (current * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    /// Snapshot of the current position.
    pub fn info(&self, len: usize) -> PageInfo {
        PageInfo {
            current: self.current.min(self.total_pages(len) - 1),
            total_pages: self.total_pages(len),
            total_items: len,
            range: self.range(len),
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// An ordered collection browsed one page at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResultSet<T> {
    items: Vec<T>,
    paginator: Paginator,
}

impl<T> PaginatedResultSet<T> {
    /// Wrap an ordered collection, starting on the first page.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            paginator: Paginator::new(page_size),
        }
    }

    /// All items, in order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items per page.
    pub fn page_size(&self) -> usize {
        self.paginator.page_size()
    }

    /// Zero-based index of the current page.
    pub fn current_page(&self) -> usize {
        self.paginator.current()
    }

    /// Total number of pages (at least 1).
    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.items.len())
    }

    /// Items on the current page, sliced from the live collection.
    pub fn page_items(&self) -> &[T] {
        &self.items[self.paginator.range(self.items.len())]
    }

    /// Position summary for rendering.
    pub fn page_info(&self) -> PageInfo {
        self.paginator.info(self.items.len())
    }

    /// Advance one page; no-op on the last page.
    pub fn next_page(&mut self) -> bool {
        self.paginator.next(self.items.len())
    }

    /// Go back one page; no-op on the first page.
    pub fn prev_page(&mut self) -> bool {
        self.paginator.prev()
    }

    /// Jump to a page, clamped to the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.paginator.set_page(page, self.items.len());
    }

    /// Jump to the first page.
    pub fn first_page(&mut self) {
        self.paginator.first();
    }

    /// Jump to the last page.
    pub fn last_page(&mut self) {
        self.paginator.last(self.items.len());
    }

    /// Keep only items matching the predicate, then re-clamp the page.
    ///
    /// Returns the number of items removed.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(keep);
        self.paginator.clamp(self.items.len());
        before - self.items.len()
    }

    /// Replace the whole collection, keeping the page index where possible.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.paginator.clamp(self.items.len());
    }

    /// Consume the set, returning the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_paginator_bounds() {
        let mut pager = Paginator::new(10);

        assert!(!pager.prev());
        assert_eq!(pager.current(), 0);

        assert!(pager.next(25));
        assert!(pager.next(25));
        assert!(!pager.next(25));
        assert_eq!(pager.current(), 2);
        assert_eq!(pager.range(25), 20..25);

        pager.set_page(99, 25);
        assert_eq!(pager.current(), 2);
    }

    #[test]
    fn test_paginator_empty_collection() {
        let mut pager = Paginator::new(10);
        assert_eq!(pager.total_pages(0), 1);
        assert!(!pager.next(0));
        assert_eq!(pager.range(0), 0..0);
        pager.last(0);
        assert_eq!(pager.current(), 0);
    }

    #[test]
    fn test_result_set_reclamps_after_retain() {
        let mut set = PaginatedResultSet::new((0..25).collect::<Vec<u32>>(), 10);
        set.last_page();
        assert_eq!(set.current_page(), 2);
        assert_eq!(set.page_items(), &[20, 21, 22, 23, 24]);

        let removed = set.retain(|n| *n < 15);
        assert_eq!(removed, 10);
        assert_eq!(set.current_page(), 1);
        assert_eq!(set.page_items(), &[10, 11, 12, 13, 14]);

        set.retain(|_| false);
        assert_eq!(set.current_page(), 0);
        assert_eq!(set.total_pages(), 1);
        assert!(set.page_items().is_empty());
    }

    #[test]
    fn test_page_info_label() {
        let set = PaginatedResultSet::new(vec!['a'; 45], 20);
        let info = set.page_info();
        assert_eq!(info.label(), "Page 1/3");
        assert_eq!(info.range, 0..20);
        assert_eq!(info.total_items, 45);
    }
}
