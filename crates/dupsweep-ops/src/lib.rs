//! File operations engine for dupsweep.
//!
//! This crate removes or renames batches of files on the operator's behalf.
//! Every item in a batch is attempted independently: a failing path is
//! reported and the rest of the batch carries on. Each success is appended
//! to a shared [`DeletionAuditLog`].
//!
//! Blocking work goes through [`SafeDeleter`]; [`OperationExecutor`] runs the
//! same batches on the tokio runtime and streams progress over channels.

mod audit;
mod delete;
mod executor;
mod operation;
mod progress;
mod rename;

pub use audit::DeletionAuditLog;
pub use delete::{DeleteMode, SafeDeleter};
pub use executor::{OperationExecutor, OperationResult};
pub use operation::{FileOperation, OperationError};
pub use progress::{OperationComplete, OperationProgress, OperationType};
pub use rename::{renamed_path, validate_filename, RENAME_METHOD};

/// Default channel buffer size for operation progress updates.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
