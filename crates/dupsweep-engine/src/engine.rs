//! The engine facade.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::info;

use dupsweep_analyze::{DuplicateConfig, DuplicateFinder, DuplicateReport, LargeFileRanker, RankConfig, SortMode};
use dupsweep_core::{Cancelled, ExtensionFilter, FileRecord, LargeFileEntry, ScanConfig, ScanError};
use dupsweep_ops::{DeletionAuditLog, OperationComplete, OperationExecutor, SafeDeleter};
use dupsweep_scan::{DirectoryScanner, ScanProgress};

use crate::session::{DuplicateSession, LargeFileSession};
use crate::settings::EngineConfig;
use crate::task::BackgroundTask;

/// Entry point for every scan, analysis and file operation.
///
/// Results are returned to the caller and never retained here. The only
/// state that outlives a request is the deletion audit log.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    scanner: DirectoryScanner,
    deleter: SafeDeleter,
}

impl Engine {
    /// Create an engine with an empty audit log.
    pub fn new(config: EngineConfig) -> Self {
        let deleter = SafeDeleter::new(Arc::new(DeletionAuditLog::new())).with_mode(config.delete_mode);
        Self {
            config,
            scanner: DirectoryScanner::new(),
            deleter,
        }
    }

    /// The configuration applied to every request.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Subscribe to progress of every scan this engine runs, including the
    /// per-root scans behind [`rank_large_files`](Self::rank_large_files).
    pub fn subscribe_scan_progress(&self) -> broadcast::Receiver<ScanProgress> {
        self.scanner.subscribe()
    }

    /// List the regular files under `root` whose extension passes `filter`.
    ///
    /// Fails as a whole on the first inaccessible entry.
    pub fn scan(
        &self,
        root: &Path,
        filter: &ExtensionFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<FileRecord>, ScanError> {
        let mut config = ScanConfig::new(root).with_filter(filter.clone());
        config.threads = self.config.threads;
        config.include_hidden = self.config.include_hidden;
        config.max_depth = self.config.max_depth;
        self.scanner.scan_with_cancel(&config, cancel)
    }

    /// Hash `records` and group those sharing a content key.
    ///
    /// Files that cannot be hashed are dropped from the candidate set.
    pub fn find_duplicates(
        &self,
        records: &[FileRecord],
        cancel: &CancellationToken,
    ) -> Result<DuplicateReport, Cancelled> {
        let config = DuplicateConfig {
            // Empty files never qualify.
            min_size: self.config.min_size.max(1),
            buffer_size: self.config.hash_buffer_size,
        };
        DuplicateFinder::with_config(config).find_duplicates_with_cancel(records, cancel)
    }

    /// Rank every file under `roots`, largest first.
    pub fn rank_large_files(
        &self,
        roots: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Result<Vec<LargeFileEntry>, ScanError> {
        let config = RankConfig {
            min_size: self.config.min_size,
            limit: self.config.limit,
            threads: self.config.threads,
            max_depth: self.config.max_depth,
            include_hidden: self.config.include_hidden,
        };
        LargeFileRanker::with_config(config)
            .with_scanner(self.scanner.clone())
            .rank_with_cancel(roots, cancel)
    }

    /// Remove `paths`, tagging audit records with `method`.
    pub fn delete(&self, paths: &[PathBuf], method: &str, cancel: &CancellationToken) -> OperationComplete {
        self.deleter.delete_batch(paths, method, cancel)
    }

    /// Rename `paths` in place to `<prefix>_<name>`.
    pub fn rename(&self, paths: &[PathBuf], prefix: &str, cancel: &CancellationToken) -> OperationComplete {
        self.deleter.rename_batch(paths, prefix, cancel)
    }

    /// Executor for running delete and rename batches with streamed progress.
    pub fn executor(&self) -> OperationExecutor {
        OperationExecutor::new(self.deleter.clone())
    }

    /// The audit log shared by every batch this engine runs.
    pub fn audit_log(&self) -> &Arc<DeletionAuditLog> {
        self.deleter.audit_log()
    }

    /// Render the audit log as `timestamp\tpath\tmethod` lines.
    pub fn export_audit_log(&self) -> String {
        self.audit_log().export()
    }

    /// Write the audit log to a file chosen by the caller.
    pub fn export_audit_log_to(&self, path: &Path) -> io::Result<()> {
        self.audit_log().export_to_path(path)
    }

    /// Wipe the audit log.
    pub fn clear_audit_log(&self) {
        self.audit_log().clear();
    }

    /// Scan `root`, find duplicates and wrap them in a browsable session.
    pub fn duplicate_session(
        &self,
        root: &Path,
        filter: &ExtensionFilter,
        sort: SortMode,
        cancel: &CancellationToken,
    ) -> Result<DuplicateSession, ScanError> {
        let records = self.scan(root, filter, cancel)?;
        let report = self.find_duplicates(&records, cancel)?;
        info!(
            root = %root.display(),
            groups = report.group_count,
            wasted = report.total_wasted_space,
            "duplicate session ready"
        );
        Ok(DuplicateSession::new(report, sort, self.config.page_size))
    }

    /// Rank `roots` and wrap the result in a browsable session.
    pub fn large_file_session(
        &self,
        roots: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Result<LargeFileSession, ScanError> {
        let entries = self.rank_large_files(roots, cancel)?;
        Ok(LargeFileSession::new(entries, self.config.page_size))
    }

    /// Build a duplicate session on the blocking pool.
    pub fn spawn_duplicate_session(
        self: &Arc<Self>,
        root: PathBuf,
        filter: ExtensionFilter,
        sort: SortMode,
    ) -> BackgroundTask<Result<DuplicateSession, ScanError>> {
        let engine = Arc::clone(self);
        BackgroundTask::spawn(move |cancel| engine.duplicate_session(&root, &filter, sort, &cancel))
    }

    /// Build a large file session on the blocking pool.
    pub fn spawn_large_file_session(
        self: &Arc<Self>,
        roots: Vec<PathBuf>,
    ) -> BackgroundTask<Result<LargeFileSession, ScanError>> {
        let engine = Arc::clone(self);
        BackgroundTask::spawn(move |cancel| engine.large_file_session(&roots, &cancel))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
