//! Engine facade for dupsweep.
//!
//! [`Engine`] ties the scanner, the analyzers and the file operations
//! together behind the handful of entry points a front end needs:
//!
//! - `scan`, `find_duplicates`, `rank_large_files` produce results
//! - `delete` and `rename` act on a selection, best effort per path
//! - `export_audit_log` and `clear_audit_log` manage the audit trail
//!
//! Each request returns its own result; browsing state lives in a
//! [`DuplicateSession`] or [`LargeFileSession`] owned by the caller.
//! Long requests can be moved to the blocking pool as a cancellable
//! [`BackgroundTask`].
//!
//! ```rust,no_run
//! use dupsweep_engine::{Engine, EngineConfig, ExtensionFilter, SortMode};
//! use tokio_util::sync::CancellationToken;
//!
//! let engine = Engine::new(EngineConfig::default());
//! let cancel = CancellationToken::new();
//! let mut session = engine
//!     .duplicate_session("/photos".as_ref(), &ExtensionFilter::parse("jpg"), SortMode::Size, &cancel)
//!     .unwrap();
//!
//! for row in session.page() {
//!     println!("{} {}", row.size, row.path.display());
//! }
//! let doomed: Vec<_> = session.page().iter().skip(1).map(|r| r.path.clone()).collect();
//! let outcome = session.delete_selected(&engine, &doomed, &cancel);
//! println!("{}", outcome.summary());
//! print!("{}", engine.export_audit_log());
//! ```

mod engine;
mod session;
mod settings;
mod task;

pub use engine::Engine;
pub use session::{DuplicateSession, LargeFileSession, DUPLICATES_METHOD, LARGE_FILES_METHOD};
pub use settings::{EngineConfig, EngineConfigBuilder, SettingsError, UserSettings};
pub use task::{BackgroundTask, TaskError};

// Re-export the types front ends render
pub use dupsweep_analyze::{DuplicateEntry, DuplicateGroup, DuplicateReport, SortMode};
pub use dupsweep_core::{
    Cancelled, ExtensionFilter, FileRecord, LargeFileEntry, PageInfo, PaginatedResultSet, ScanError,
};
pub use dupsweep_ops::{
    DeleteMode, DeletionAuditLog, OperationComplete, OperationError, OperationExecutor,
    OperationProgress, OperationResult,
};
pub use dupsweep_scan::ScanProgress;
