//! Rename-with-prefix, the non-destructive sibling of deletion.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use dupsweep_core::RenameError;

use crate::delete::SafeDeleter;
use crate::progress::{OperationComplete, OperationType};
use crate::OperationError;

/// Audit method tag for renamed files.
pub const RENAME_METHOD: &str = "rename";

/// Destination for `path` once `prefix` is applied: `<parent>/<prefix>_<name>`.
///
/// Returns `None` for paths without a file name (such as `/` or `..`).
pub fn renamed_path(path: &Path, prefix: &str) -> Option<PathBuf> {
    let name = path.file_name()?;
    let mut new_name = OsString::from(prefix);
    new_name.push("_");
    new_name.push(name);
    Some(path.with_file_name(new_name))
}

impl SafeDeleter {
    /// Rename one regular file by prefixing its name, returning the new path.
    ///
    /// An existing destination is never overwritten. A success is recorded
    /// in the audit log against the old path.
    pub fn rename_one(&self, path: &Path, prefix: &str) -> Result<PathBuf, RenameError> {
        validate_filename(prefix).map_err(|reason| RenameError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason,
        })?;

        let metadata = fs::symlink_metadata(path).map_err(|e| RenameError::io(path, e))?;
        if !metadata.is_file() {
            return Err(RenameError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let target = renamed_path(path, prefix).ok_or_else(|| RenameError::NotAFile {
            path: path.to_path_buf(),
        })?;

        if fs::symlink_metadata(&target).is_ok() {
            return Err(RenameError::Collision {
                from: path.to_path_buf(),
                to: target,
            });
        }

        fs::rename(path, &target).map_err(|e| RenameError::io(path, e))?;

        self.audit.record(path, RENAME_METHOD);
        info!(from = %path.display(), to = %target.display(), "renamed file");

        Ok(target)
    }

    /// Rename every path in `paths`, never stopping on a failure.
    pub fn rename_batch(
        &self,
        paths: &[PathBuf],
        prefix: &str,
        cancel: &CancellationToken,
    ) -> OperationComplete {
        let mut outcome = OperationComplete::new(OperationType::Rename);

        for path in paths {
            if cancel.is_cancelled() {
                let err = RenameError::Cancelled { path: path.clone() };
                outcome.errors.push(OperationError::new(path.clone(), err.to_string()));
                continue;
            }

            match self.rename_one(path, prefix) {
                Ok(target) => {
                    outcome.succeeded.push(path.clone());
                    outcome.renamed.push((path.clone(), target));
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "rename failed");
                    outcome.errors.push(OperationError::new(path.clone(), err.to_string()));
                }
            }
        }

        info!("{}", outcome.summary());
        outcome
    }
}

/// Validate a filename (or filename fragment) for cross-platform compatibility.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.len() > 255 {
        return Err("Name is too long (max 255 characters)".into());
    }

    let invalid_chars = ['/', '\0'];
    for c in invalid_chars {
        if name.contains(c) {
            return Err(format!("Name cannot contain '{}'", c));
        }
    }

    #[cfg(target_os = "windows")]
    {
        let windows_invalid = ['\\', ':', '*', '?', '"', '<', '>', '|'];
        for c in windows_invalid {
            if name.contains(c) {
                return Err(format!("Name cannot contain '{}'", c));
            }
        }
    }

    if name.starts_with(' ') || name.ends_with(' ') {
        return Err("Name cannot start or end with spaces".into());
    }

    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeletionAuditLog;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_renamed_path() {
        assert_eq!(
            renamed_path(Path::new("/data/photo.jpg"), "bak"),
            Some(PathBuf::from("/data/bak_photo.jpg"))
        );
        assert_eq!(renamed_path(Path::new("/"), "bak"), None);
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("bak").is_ok());
        assert!(validate_filename(".old").is_ok());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("a/b").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename(" bak").is_err());
    }

    #[test]
    fn test_rename_collision_keeps_both_files() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("report.txt");
        let existing = temp.path().join("bak_report.txt");
        fs::write(&source, "new").unwrap();
        fs::write(&existing, "old").unwrap();

        let deleter = SafeDeleter::new(Arc::new(DeletionAuditLog::new()));
        let err = deleter.rename_one(&source, "bak").unwrap_err();

        assert!(matches!(err, RenameError::Collision { .. }));
        assert_eq!(fs::read_to_string(&source).unwrap(), "new");
        assert_eq!(fs::read_to_string(&existing).unwrap(), "old");
        assert!(deleter.audit_log().is_empty());
    }

    #[test]
    fn test_invalid_prefix() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "a").unwrap();

        let deleter = SafeDeleter::new(Arc::new(DeletionAuditLog::new()));
        let err = deleter.rename_one(&source, "x/y").unwrap_err();

        assert!(matches!(err, RenameError::InvalidPrefix { .. }));
        assert!(source.exists());
    }
}
