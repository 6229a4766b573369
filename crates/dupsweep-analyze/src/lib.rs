//! Analysis algorithms for dupsweep.
//!
//! This crate turns scanned [`FileRecord`]s into results an operator can act on:
//!
//! - **Content hashing** - streaming BLAKE3 digests keyed with the file size
//! - **Duplicate detection** - groups of files sharing a [`ContentKey`]
//! - **Large file ranking** - files across several roots ordered by size
//!
//! # Duplicate Detection
//!
//! ```rust,ignore
//! use dupsweep_analyze::{DuplicateFinder, SortMode};
//! use dupsweep_scan::{DirectoryScanner, ScanConfig};
//!
//! let files = DirectoryScanner::new().scan(&ScanConfig::new("/path/to/scan")).unwrap();
//! let report = DuplicateFinder::new().find_duplicates(&files);
//!
//! println!("Found {} duplicate groups", report.group_count);
//! for entry in report.entries(SortMode::Size) {
//!     println!("{} {}", entry.size, entry.path.display());
//! }
//! ```
//!
//! # Large Files
//!
//! ```rust,ignore
//! use dupsweep_analyze::LargeFileRanker;
//!
//! let ranking = LargeFileRanker::new().rank(&["/home".into(), "/srv".into()]).unwrap();
//! for entry in ranking.iter().take(10) {
//!     println!("{:>12} {}", entry.size, entry.path.display());
//! }
//! ```

mod duplicates;
mod hasher;
mod large;

pub use duplicates::{
    DuplicateConfig, DuplicateConfigBuilder, DuplicateEntry, DuplicateFinder, DuplicateGroup,
    DuplicateReport, SortMode,
};
pub use hasher::{ContentHasher, DEFAULT_HASH_BUFFER};
pub use large::{LargeFileRanker, RankConfig, RankConfigBuilder};

// Re-export core types
pub use dupsweep_core::{ContentHash, ContentKey, FileRecord, HashError, LargeFileEntry};
