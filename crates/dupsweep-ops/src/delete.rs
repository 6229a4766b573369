//! Best-effort batch deletion.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use dupsweep_core::DeleteError;

use crate::audit::DeletionAuditLog;
use crate::progress::{OperationComplete, OperationType};
use crate::OperationError;

/// How files are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Unlink the file.
    #[default]
    Permanent,
    /// Move the file to the system trash.
    Trash,
}

/// Removes or renames files one at a time, recording successes in the
/// audit log and collecting per-path failures.
#[derive(Debug, Clone)]
pub struct SafeDeleter {
    pub(crate) audit: Arc<DeletionAuditLog>,
    pub(crate) mode: DeleteMode,
}

impl SafeDeleter {
    /// Create a deleter that writes to `audit` and unlinks files.
    pub fn new(audit: Arc<DeletionAuditLog>) -> Self {
        Self {
            audit,
            mode: DeleteMode::Permanent,
        }
    }

    /// Set the removal mode.
    pub fn with_mode(mut self, mode: DeleteMode) -> Self {
        self.mode = mode;
        self
    }

    /// The removal mode.
    pub fn mode(&self) -> DeleteMode {
        self.mode
    }

    /// The audit log successes are written to.
    pub fn audit_log(&self) -> &Arc<DeletionAuditLog> {
        &self.audit
    }

    /// Remove a single regular file, returning its size.
    ///
    /// On success a record tagged with `method` is appended to the audit log.
    pub fn delete_one(&self, path: &Path, method: &str) -> Result<u64, DeleteError> {
        let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::io(path, e))?;
        if !metadata.is_file() {
            return Err(DeleteError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        match self.mode {
            DeleteMode::Permanent => fs::remove_file(path).map_err(|e| DeleteError::io(path, e))?,
            DeleteMode::Trash => trash::delete(path).map_err(|e| DeleteError::Trash {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
        }

        self.audit.record(path, method);
        info!(path = %path.display(), method, bytes = metadata.len(), mode = ?self.mode, "deleted file");

        Ok(metadata.len())
    }

    /// Remove every path in `paths`, never stopping on a failure.
    ///
    /// If `cancel` fires, the paths not yet attempted are reported as
    /// cancelled rather than silently dropped.
    pub fn delete_batch(
        &self,
        paths: &[PathBuf],
        method: &str,
        cancel: &CancellationToken,
    ) -> OperationComplete {
        let mut outcome = OperationComplete::new(OperationType::Delete);

        for path in paths {
            if cancel.is_cancelled() {
                let err = DeleteError::Cancelled { path: path.clone() };
                outcome.errors.push(OperationError::new(path.clone(), err.to_string()));
                continue;
            }

            match self.delete_one(path, method) {
                Ok(bytes) => {
                    outcome.bytes_processed += bytes;
                    outcome.succeeded.push(path.clone());
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "delete failed");
                    outcome.errors.push(OperationError::new(path.clone(), err.to_string()));
                }
            }
        }

        info!("{}", outcome.summary());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn deleter() -> SafeDeleter {
        SafeDeleter::new(Arc::new(DeletionAuditLog::new()))
    }

    #[test]
    fn test_delete_one_records_audit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("victim.txt");
        fs::write(&path, "bytes").unwrap();

        let deleter = deleter();
        let size = deleter.delete_one(&path, "duplicates").unwrap();

        assert_eq!(size, 5);
        assert!(!path.exists());
        let records = deleter.audit_log().snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, path);
        assert_eq!(records[0].method, "duplicates");
    }

    #[test]
    fn test_delete_directory_is_refused() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();

        let err = deleter().delete_one(&dir, "duplicates").unwrap_err();

        assert!(matches!(err, DeleteError::NotAFile { .. }));
        assert!(dir.exists());
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        let missing = temp.path().join("missing");

        let deleter = deleter();
        let outcome = deleter.delete_batch(
            &[a.clone(), missing.clone(), b.clone()],
            "large-files",
            &CancellationToken::new(),
        );

        assert_eq!(outcome.succeeded, vec![a, b]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].path, missing);
        assert_eq!(deleter.audit_log().len(), 2);
    }

    #[test]
    fn test_cancelled_batch_reports_remaining() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        fs::write(&a, "a").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let deleter = deleter();
        let outcome = deleter.delete_batch(&[a.clone()], "duplicates", &cancel);

        assert_eq!(outcome.success_count(), 0);
        assert_eq!(outcome.failure_count(), 1);
        assert!(a.exists());
        assert!(deleter.audit_log().is_empty());
    }
}
