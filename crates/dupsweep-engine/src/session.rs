//! Per-request result sessions.
//!
//! A session owns the results of one engine request and the page the
//! operator is looking at. Acting on a selection through a session removes
//! the affected rows and re-clamps the page, so the view never points past
//! the end of a collection that just shrank.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use dupsweep_analyze::{DuplicateEntry, DuplicateReport, SortMode};
use dupsweep_core::{LargeFileEntry, PageInfo, PaginatedResultSet};
use dupsweep_ops::OperationComplete;

use crate::engine::Engine;

/// Audit method tag for removals issued from duplicate results.
pub const DUPLICATES_METHOD: &str = "duplicates";

/// Audit method tag for removals issued from large file results.
pub const LARGE_FILES_METHOD: &str = "large-files";

/// Duplicate groups plus the paginated flat list shown to the operator.
#[derive(Debug, Clone)]
pub struct DuplicateSession {
    report: DuplicateReport,
    sort: SortMode,
    rows: PaginatedResultSet<DuplicateEntry>,
}

impl DuplicateSession {
    /// Wrap a report, flattening it in `sort` order.
    pub fn new(report: DuplicateReport, sort: SortMode, page_size: usize) -> Self {
        let rows = PaginatedResultSet::new(report.entries(sort), page_size);
        Self { report, sort, rows }
    }

    /// The grouped results.
    pub fn report(&self) -> &DuplicateReport {
        &self.report
    }

    /// Current ordering of the flat list.
    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// Re-sort the flat list, keeping the page index where possible.
    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        self.rows.replace(self.report.entries(sort));
    }

    /// The flat list with its page position.
    pub fn rows(&self) -> &PaginatedResultSet<DuplicateEntry> {
        &self.rows
    }

    /// Mutable access for page navigation.
    pub fn rows_mut(&mut self) -> &mut PaginatedResultSet<DuplicateEntry> {
        &mut self.rows
    }

    /// Rows on the current page.
    pub fn page(&self) -> &[DuplicateEntry] {
        self.rows.page_items()
    }

    /// Position summary for rendering.
    pub fn page_info(&self) -> PageInfo {
        self.rows.page_info()
    }

    /// Delete `paths` through `engine`, then drop them from this session.
    pub fn delete_selected(
        &mut self,
        engine: &Engine,
        paths: &[PathBuf],
        cancel: &CancellationToken,
    ) -> OperationComplete {
        let outcome = engine.delete(paths, DUPLICATES_METHOD, cancel);
        self.forget(&outcome.succeeded);
        outcome
    }

    /// Rename `paths` through `engine`, then drop the old paths from this session.
    pub fn rename_selected(
        &mut self,
        engine: &Engine,
        paths: &[PathBuf],
        prefix: &str,
        cancel: &CancellationToken,
    ) -> OperationComplete {
        let outcome = engine.rename(paths, prefix, cancel);
        self.forget(&outcome.succeeded);
        outcome
    }

    fn forget(&mut self, paths: &[PathBuf]) {
        if paths.is_empty() {
            return;
        }
        // Group indices shift when groups dissolve, so rebuild the rows.
        self.report.remove_paths(paths);
        self.rows.replace(self.report.entries(self.sort));
    }
}

/// Ranked large files, paginated.
#[derive(Debug, Clone)]
pub struct LargeFileSession {
    rows: PaginatedResultSet<LargeFileEntry>,
}

impl LargeFileSession {
    /// Wrap a ranking that is already sorted largest first.
    pub fn new(entries: Vec<LargeFileEntry>, page_size: usize) -> Self {
        Self {
            rows: PaginatedResultSet::new(entries, page_size),
        }
    }

    /// The ranking with its page position.
    pub fn rows(&self) -> &PaginatedResultSet<LargeFileEntry> {
        &self.rows
    }

    /// Mutable access for page navigation.
    pub fn rows_mut(&mut self) -> &mut PaginatedResultSet<LargeFileEntry> {
        &mut self.rows
    }

    /// Entries on the current page.
    pub fn page(&self) -> &[LargeFileEntry] {
        self.rows.page_items()
    }

    /// Position summary for rendering.
    pub fn page_info(&self) -> PageInfo {
        self.rows.page_info()
    }

    /// Total bytes across the whole ranking.
    pub fn total_size(&self) -> u64 {
        self.rows.items().iter().map(|e| e.size).sum()
    }

    /// Delete `paths` through `engine`, then drop them from the ranking.
    pub fn delete_selected(
        &mut self,
        engine: &Engine,
        paths: &[PathBuf],
        cancel: &CancellationToken,
    ) -> OperationComplete {
        let outcome = engine.delete(paths, LARGE_FILES_METHOD, cancel);
        self.forget(&outcome.succeeded);
        outcome
    }

    /// Rename `paths` through `engine`, then drop the old paths from the ranking.
    pub fn rename_selected(
        &mut self,
        engine: &Engine,
        paths: &[PathBuf],
        prefix: &str,
        cancel: &CancellationToken,
    ) -> OperationComplete {
        let outcome = engine.rename(paths, prefix, cancel);
        self.forget(&outcome.succeeded);
        outcome
    }

    fn forget(&mut self, paths: &[PathBuf]) {
        let gone: HashSet<&Path> = paths.iter().map(PathBuf::as_path).collect();
        self.rows.retain(|entry| !gone.contains(entry.path.as_path()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(n: u64) -> Vec<LargeFileEntry> {
        (0..n)
            .map(|i| LargeFileEntry::new(format!("/f{i:02}"), 1000 - i))
            .collect()
    }

    #[test]
    fn test_large_session_forget_clamps_page() {
        let mut session = LargeFileSession::new(ranking(5), 2);
        session.rows_mut().last_page();
        assert_eq!(session.page_info().label(), "Page 3/3");

        let doomed: Vec<PathBuf> = ["/f02", "/f03", "/f04"].iter().map(PathBuf::from).collect();
        session.forget(&doomed);

        assert_eq!(session.page_info().label(), "Page 1/1");
        assert_eq!(session.page().len(), 2);
    }

    #[test]
    fn test_large_session_total_size() {
        let session = LargeFileSession::new(ranking(3), 10);
        assert_eq!(session.total_size(), 1000 + 999 + 998);
    }

    #[test]
    fn test_empty_duplicate_session_has_one_page() {
        let session = DuplicateSession::new(DuplicateReport::default(), SortMode::Path, 20);
        let info = session.page_info();
        assert_eq!(info.total_pages, 1);
        assert!(info.is_empty());
    }
}
