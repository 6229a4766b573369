//! Directory scanning engine for dupsweep.
//!
//! This crate walks a root directory with jwalk and yields the regular files
//! beneath it as [`FileRecord`]s.
//!
//! # Overview
//!
//! - **Fail-fast**: an unreadable entry aborts the whole scan with a
//!   [`ScanError`]; no partial list is returned.
//! - **Extension filtering** via [`ExtensionFilter`] (case-insensitive).
//! - **Cooperative cancellation** via a `CancellationToken` checked between
//!   entries.
//! - **Progress updates** via broadcast channels.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupsweep_scan::{DirectoryScanner, ExtensionFilter, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/scan").with_filter(ExtensionFilter::parse("jpg,png"));
//! let files = DirectoryScanner::new().scan(&config).unwrap();
//!
//! for file in &files {
//!     println!("{} ({} bytes)", file.path.display(), file.size);
//! }
//! ```

mod progress;
mod scanner;

pub use progress::ScanProgress;
pub use scanner::DirectoryScanner;

// Re-export core types for convenience
pub use dupsweep_core::{ExtensionFilter, FileRecord, ScanConfig, ScanError};
