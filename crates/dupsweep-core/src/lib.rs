//! Core types for dupsweep.
//!
//! This crate provides the data structures shared by every other dupsweep
//! crate: scanned file records, content keys, deletion records, the error
//! taxonomy, scan configuration, and the pagination primitives used to
//! browse result sets.

mod config;
mod error;
mod filter;
mod page;
mod record;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{Cancelled, DeleteError, HashError, RenameError, ScanError};
pub use filter::ExtensionFilter;
pub use page::{total_pages, PageInfo, PaginatedResultSet, Paginator, DEFAULT_PAGE_SIZE};
pub use record::{ContentHash, ContentKey, DeletionRecord, FileRecord, LargeFileEntry, AUDIT_FIELD_SEPARATOR};
