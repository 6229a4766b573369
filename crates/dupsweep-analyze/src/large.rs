//! Ranking of the largest files across one or more roots.

use std::fs;
use std::path::PathBuf;

use derive_builder::Builder;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use dupsweep_core::{FileRecord, LargeFileEntry, ScanConfig, ScanError};
use dupsweep_scan::DirectoryScanner;

/// Configuration for large file ranking.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct RankConfig {
    /// Files smaller than this are left out of the ranking.
    #[builder(default = "0")]
    pub min_size: u64,

    /// Maximum number of entries to return (0 = unlimited).
    #[builder(default = "0")]
    pub limit: usize,

    /// Number of threads for directory reads (0 = auto-detect).
    #[builder(default = "0")]
    pub threads: usize,

    /// Maximum depth to descend below each root (None = unlimited).
    #[builder(default)]
    pub max_depth: Option<u32>,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    pub include_hidden: bool,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            min_size: 0,
            limit: 0,
            threads: 0,
            max_depth: None,
            include_hidden: true,
        }
    }
}

impl RankConfig {
    /// Create a new config builder.
    pub fn builder() -> RankConfigBuilder {
        RankConfigBuilder::default()
    }
}

/// Merges scans of several roots and orders the files by size.
pub struct LargeFileRanker {
    config: RankConfig,
    scanner: DirectoryScanner,
}

impl LargeFileRanker {
    /// Create a ranker with default config.
    pub fn new() -> Self {
        Self::with_config(RankConfig::default())
    }

    /// Create a ranker with custom config.
    pub fn with_config(config: RankConfig) -> Self {
        Self {
            config,
            scanner: DirectoryScanner::new(),
        }
    }

    /// Scan through `scanner`, so its progress subscribers see every root.
    pub fn with_scanner(mut self, scanner: DirectoryScanner) -> Self {
        self.scanner = scanner;
        self
    }

    /// Scanner used for each root, exposed so callers can subscribe to progress.
    pub fn scanner(&self) -> &DirectoryScanner {
        &self.scanner
    }

    /// Rank every file under `roots`, largest first.
    pub fn rank(&self, roots: &[PathBuf]) -> Result<Vec<LargeFileEntry>, ScanError> {
        self.rank_with_cancel(roots, &CancellationToken::new())
    }

    /// Rank every file under `roots`, stopping early if `cancel` fires.
    ///
    /// A root that fails to scan fails the whole ranking. Files that vanish
    /// or become unreadable between the scan and the re-stat are dropped.
    pub fn rank_with_cancel(
        &self,
        roots: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Result<Vec<LargeFileEntry>, ScanError> {
        let mut records = Vec::new();
        for root in roots {
            let mut config = ScanConfig::new(root);
            config.threads = self.config.threads;
            config.max_depth = self.config.max_depth;
            config.include_hidden = self.config.include_hidden;
            records.extend(self.scanner.scan_with_cancel(&config, cancel)?);
        }

        let mut entries = self.restat(records, cancel)?;
        entries.sort_by(LargeFileEntry::rank_cmp);
        // Overlapping roots report the same canonical path twice.
        entries.dedup_by(|a, b| a.path == b.path);

        if self.config.limit > 0 {
            entries.truncate(self.config.limit);
        }

        info!(roots = roots.len(), files = entries.len(), "large file ranking complete");
        Ok(entries)
    }

    fn restat(
        &self,
        records: Vec<FileRecord>,
        cancel: &CancellationToken,
    ) -> Result<Vec<LargeFileEntry>, ScanError> {
        let entries: Vec<LargeFileEntry> = records
            .into_par_iter()
            .filter_map(|record| {
                if cancel.is_cancelled() {
                    return None;
                }
                match fs::metadata(&record.path) {
                    Ok(meta) if meta.is_file() => Some(LargeFileEntry::new(record.path, meta.len())),
                    Ok(_) => None,
                    Err(err) => {
                        debug!(path = %record.path.display(), error = %err, "file vanished before stat");
                        None
                    }
                }
            })
            .filter(|entry| entry.size >= self.config.min_size)
            .collect();

        if cancel.is_cancelled() {
            return Err(ScanError::Interrupted);
        }
        Ok(entries)
    }
}

impl Default for LargeFileRanker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_equal_sizes_ordered_by_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.bin"), [0u8; 10]).unwrap();
        fs::write(temp.path().join("a.bin"), [0u8; 10]).unwrap();

        let entries = LargeFileRanker::new()
            .rank(&[temp.path().to_path_buf()])
            .unwrap();

        assert!(entries[0].path.ends_with("a.bin"));
        assert!(entries[1].path.ends_with("b.bin"));
    }

    #[test]
    fn test_vanished_file_is_dropped() {
        let temp = TempDir::new().unwrap();
        let kept = temp.path().join("kept");
        fs::write(&kept, "abc").unwrap();

        let records = vec![
            FileRecord::new(&kept, 3),
            FileRecord::new(temp.path().join("gone"), 99),
        ];
        let entries = LargeFileRanker::new()
            .restat(records, &CancellationToken::new())
            .unwrap();

        assert_eq!(entries, vec![LargeFileEntry::new(kept, 3)]);
    }

    #[test]
    fn test_limit_and_min_size() {
        let temp = TempDir::new().unwrap();
        for (name, size) in [("a", 5usize), ("b", 50), ("c", 500), ("d", 5000)] {
            fs::write(temp.path().join(name), vec![1u8; size]).unwrap();
        }

        let config = RankConfig::builder().min_size(10u64).limit(2usize).build().unwrap();
        let entries = LargeFileRanker::with_config(config)
            .rank(&[temp.path().to_path_buf()])
            .unwrap();

        let sizes: Vec<_> = entries.iter().map(|e| e.size).collect();
        assert_eq!(sizes, vec![5000, 500]);
    }

    #[test]
    fn test_shared_scanner_reports_progress() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("one"), "1").unwrap();

        let scanner = DirectoryScanner::new();
        let mut rx = scanner.subscribe();
        LargeFileRanker::new()
            .with_scanner(scanner.clone())
            .rank(&[temp.path().to_path_buf()])
            .unwrap();

        let progress = rx.try_recv().unwrap();
        assert!(progress.finished);
        assert_eq!(progress.files_found, 1);
    }
}
