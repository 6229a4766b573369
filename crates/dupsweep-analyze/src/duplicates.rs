//! Duplicate file detection using content hashing.
//!
//! Uses a two-phase algorithm:
//! 1. Group files by size (instant, O(n)); a unique size cannot be a duplicate
//! 2. Compute the full BLAKE3 hash of every size-matched file in parallel and
//!    key the results by (hash, size)
//!
//! Files that cannot be hashed (empty or unreadable) are skipped; they only
//! shrink the candidate set.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use dashmap::DashMap;
use derive_builder::Builder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use dupsweep_core::{Cancelled, ContentHash, ContentKey, FileRecord};

use crate::hasher::{ContentHasher, DEFAULT_HASH_BUFFER};

/// Configuration for duplicate detection.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct DuplicateConfig {
    /// Minimum file size to consider. Empty files never qualify.
    #[builder(default = "1")]
    pub min_size: u64,

    /// Read buffer used while hashing.
    #[builder(default = "DEFAULT_HASH_BUFFER")]
    pub buffer_size: usize,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            min_size: 1,
            buffer_size: DEFAULT_HASH_BUFFER,
        }
    }
}

impl DuplicateConfig {
    /// Create a new config builder.
    pub fn builder() -> DuplicateConfigBuilder {
        DuplicateConfigBuilder::default()
    }
}

/// Ordering of the flattened duplicate list shown to the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Lexicographic by path.
    #[default]
    Path,
    /// Ascending by file size, path order on ties.
    Size,
}

/// A group of duplicate files sharing the same content key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Content hash shared by all files in this group.
    pub hash: ContentHash,

    /// Size of each file in bytes.
    pub size: u64,

    /// Paths to all duplicate files, in scan order.
    pub paths: Vec<PathBuf>,

    /// Wasted space: size * (count - 1).
    pub wasted_bytes: u64,
}

impl DuplicateGroup {
    fn new(key: ContentKey, paths: Vec<PathBuf>) -> Self {
        let wasted_bytes = key.size * (paths.len() as u64).saturating_sub(1);
        Self {
            hash: key.hash,
            size: key.size,
            paths,
            wasted_bytes,
        }
    }

    /// The content key shared by every member.
    pub fn key(&self) -> ContentKey {
        ContentKey::new(self.hash, self.size)
    }

    /// Get the number of duplicate files.
    pub fn count(&self) -> usize {
        self.paths.len()
    }

    /// Check if keeping one file, how many could be deleted.
    pub fn deletable_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// One row of the flattened duplicate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    /// Index of the owning group in [`DuplicateReport::groups`].
    pub group: usize,
    /// Path of this copy.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Content hash shared with the rest of the group.
    pub hash: ContentHash,
}

/// Results from duplicate analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Groups of duplicate files, ordered by their first path.
    pub groups: Vec<DuplicateGroup>,

    /// Total size of all duplicate files.
    pub total_duplicate_size: u64,

    /// Total wasted space (could be reclaimed).
    pub total_wasted_space: u64,

    /// Number of files handed to the finder.
    pub files_analyzed: u64,

    /// Number of files whose content was hashed.
    pub files_hashed: u64,

    /// Number of files skipped because they were empty or unreadable.
    pub files_skipped: u64,

    /// Number of files that have duplicates.
    pub files_with_duplicates: u64,

    /// Number of duplicate groups.
    pub group_count: usize,
}

impl DuplicateReport {
    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Get total number of duplicate files across all groups.
    pub fn total_duplicate_files(&self) -> usize {
        self.groups.iter().map(|g| g.paths.len()).sum()
    }

    /// Flatten all groups into one display list, sorted by `mode`.
    ///
    /// The sort applies to the whole list, not within each group.
    pub fn entries(&self, mode: SortMode) -> Vec<DuplicateEntry> {
        let mut entries: Vec<DuplicateEntry> = self
            .groups
            .iter()
            .enumerate()
            .flat_map(|(index, group)| {
                group.paths.iter().map(move |path| DuplicateEntry {
                    group: index,
                    path: path.clone(),
                    size: group.size,
                    hash: group.hash,
                })
            })
            .collect();

        entries.sort_by(|a, b| compare_entries(a, b, mode));
        entries
    }

    /// Drop removed paths, then any group left with fewer than two members.
    ///
    /// Totals are recomputed. Returns the number of paths dropped.
    pub fn remove_paths<P: AsRef<Path>>(&mut self, removed: &[P]) -> usize {
        let removed: HashSet<&Path> = removed.iter().map(AsRef::as_ref).collect();
        let mut dropped = 0;

        for group in &mut self.groups {
            let before = group.paths.len();
            group.paths.retain(|p| !removed.contains(p.as_path()));
            dropped += before - group.paths.len();
            group.wasted_bytes = group.size * (group.paths.len() as u64).saturating_sub(1);
        }
        self.groups.retain(|g| g.paths.len() >= 2);
        self.recompute_totals();

        dropped
    }

    fn recompute_totals(&mut self) {
        self.total_duplicate_size = self
            .groups
            .iter()
            .map(|g| g.size * g.paths.len() as u64)
            .sum();
        self.total_wasted_space = self.groups.iter().map(|g| g.wasted_bytes).sum();
        self.files_with_duplicates = self.groups.iter().map(|g| g.paths.len() as u64).sum();
        self.group_count = self.groups.len();
    }
}

fn compare_entries(a: &DuplicateEntry, b: &DuplicateEntry, mode: SortMode) -> Ordering {
    match mode {
        SortMode::Path => a.path.cmp(&b.path),
        SortMode::Size => a.size.cmp(&b.size).then_with(|| a.path.cmp(&b.path)),
    }
}

/// Duplicate file finder.
pub struct DuplicateFinder {
    config: DuplicateConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with default config.
    pub fn new() -> Self {
        Self {
            config: DuplicateConfig::default(),
        }
    }

    /// Create a new duplicate finder with custom config.
    pub fn with_config(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// Find duplicates among scanned files.
    pub fn find_duplicates(&self, records: &[FileRecord]) -> DuplicateReport {
        // An untriggered token never cancels.
        self.find_duplicates_with_cancel(records, &CancellationToken::new())
            .unwrap_or_default()
    }

    /// Find duplicates, checking `cancel` before each file is hashed.
    pub fn find_duplicates_with_cancel(
        &self,
        records: &[FileRecord],
        cancel: &CancellationToken,
    ) -> Result<DuplicateReport, Cancelled> {
        let files_analyzed = records.len() as u64;
        let files_skipped = AtomicU64::new(0);

        // Phase 1: group by size, keeping the scan index of every record
        let mut by_size: HashMap<u64, Vec<(usize, &FileRecord)>> = HashMap::new();
        for (index, record) in records.iter().enumerate() {
            if record.size == 0 {
                debug!(path = %record.path.display(), "skipping empty file");
                files_skipped.fetch_add(1, AtomicOrdering::Relaxed);
                continue;
            }
            if record.size < self.config.min_size {
                continue;
            }
            by_size.entry(record.size).or_default().push((index, record));
        }

        let candidates: Vec<(usize, &FileRecord)> = by_size
            .into_values()
            .filter(|files| files.len() > 1)
            .flatten()
            .collect();
        let files_hashed = candidates.len() as u64;

        // Phase 2: hash in parallel, aggregating into a concurrent map
        let hasher = ContentHasher::with_buffer_size(self.config.buffer_size);
        let by_key: DashMap<ContentKey, Vec<(usize, PathBuf)>> = DashMap::new();

        candidates.par_iter().for_each(|(index, record)| {
            if cancel.is_cancelled() {
                return;
            }
            match hasher.hash_file(&record.path) {
                Ok(key) => by_key
                    .entry(key)
                    .or_default()
                    .push((*index, record.path.clone())),
                Err(err) => {
                    debug!(error = %err, "skipping unhashable file");
                    files_skipped.fetch_add(1, AtomicOrdering::Relaxed);
                }
            }
        });

        if cancel.is_cancelled() {
            info!("duplicate search cancelled");
            return Err(Cancelled);
        }

        let mut groups: Vec<DuplicateGroup> = by_key
            .into_iter()
            .filter(|(_, members)| members.len() > 1)
            .map(|(key, mut members)| {
                members.sort_by_key(|(index, _)| *index);
                DuplicateGroup::new(key, members.into_iter().map(|(_, p)| p).collect())
            })
            .collect();

        groups.sort_by(|a, b| a.paths[0].cmp(&b.paths[0]).then_with(|| a.hash.cmp(&b.hash)));

        let mut report = DuplicateReport {
            groups,
            files_analyzed,
            files_hashed,
            files_skipped: files_skipped.into_inner(),
            ..Default::default()
        };
        report.recompute_totals();

        info!(
            analyzed = report.files_analyzed,
            hashed = report.files_hashed,
            skipped = report.files_skipped,
            groups = report.group_count,
            "duplicate search complete"
        );

        Ok(report)
    }
}

impl Default for DuplicateFinder {
    fn default() -> Self {
        Self::new()
    }
}
