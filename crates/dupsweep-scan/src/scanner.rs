//! JWalk-based directory scanner.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use dupsweep_core::{FileRecord, ScanConfig, ScanError};

use crate::progress::ScanProgress;

/// Files between two progress broadcasts.
const PROGRESS_INTERVAL: u64 = 1000;

/// Scanner that lists the regular files under a root using jwalk.
///
/// Clones share one progress channel.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl DirectoryScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan without a cancellation point.
    pub fn scan(&self, config: &ScanConfig) -> Result<Vec<FileRecord>, ScanError> {
        self.scan_with_cancel(config, &CancellationToken::new())
    }

    /// Scan the configured root, stopping early if `cancel` fires.
    ///
    /// The first inaccessible entry aborts the scan; a cancelled scan
    /// returns [`ScanError::Interrupted`]. Records come back in traversal
    /// order, which is sorted per directory.
    pub fn scan_with_cancel(
        &self,
        config: &ScanConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<FileRecord>, ScanError> {
        let start = Instant::now();
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        if cancel.is_cancelled() {
            return Err(ScanError::Interrupted);
        }

        debug!(root = %root_path.display(), filter = ?config.filter, "starting scan");

        let parallelism = match config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let walker = WalkDir::new(&root_path)
            .parallelism(parallelism)
            .skip_hidden(!config.include_hidden)
            .follow_links(false)
            .sort(true)
            .min_depth(1)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX));

        let mut records = Vec::new();
        let mut progress = ScanProgress::new();

        for entry_result in walker {
            if cancel.is_cancelled() {
                info!(root = %root_path.display(), found = records.len(), "scan cancelled");
                return Err(ScanError::Interrupted);
            }

            let entry = entry_result.map_err(|err| walk_error(&root_path, &err))?;
            let file_type = entry.file_type();

            // jwalk yields an unreadable directory as Ok and keeps the error on the entry.
            if let Some(err) = &entry.read_children_error {
                return Err(walk_error(&entry.path(), err));
            }

            if !file_type.is_file() {
                continue;
            }

            let path = entry.path();
            if !config.filter.matches(&path) {
                continue;
            }

            let metadata = entry
                .metadata()
                .map_err(|err| walk_error(&path, &err))?;

            progress.files_found += 1;
            progress.bytes_found += metadata.len();

            if progress.files_found % PROGRESS_INTERVAL == 0 {
                progress.current_path = path.clone();
                progress.elapsed = start.elapsed();
                let _ = self.progress_tx.send(progress.clone());
            }

            records.push(FileRecord::new(path, metadata.len()));
        }

        progress.elapsed = start.elapsed();
        progress.finished = true;
        let _ = self.progress_tx.send(progress);

        info!(
            root = %root_path.display(),
            files = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );

        Ok(records)
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a jwalk error into a scan error, keeping the failing path.
fn walk_error(fallback: &Path, err: &jwalk::Error) -> ScanError {
    let path = err.path().unwrap_or(fallback).to_path_buf();
    let kind = err
        .io_error()
        .map(io::Error::kind)
        .unwrap_or(io::ErrorKind::Other);
    ScanError::io(path, io::Error::new(kind, err.to_string()))
}
