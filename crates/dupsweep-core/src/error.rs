//! Error types for scanning, hashing, deletion and rename.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that abort a whole directory scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Operation was interrupted.
    #[error("Operation interrupted")]
    Interrupted,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Path associated with this error, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PermissionDenied { path }
            | Self::NotFound { path }
            | Self::Io { path, .. }
            | Self::NotADirectory { path } => Some(path),
            Self::Interrupted | Self::InvalidConfig { .. } => None,
        }
    }
}

impl From<Cancelled> for ScanError {
    fn from(_: Cancelled) -> Self {
        Self::Interrupted
    }
}

/// A file could not be hashed and is skipped from duplicate detection.
#[derive(Debug, Error)]
pub enum HashError {
    /// Zero-length files carry no content to compare.
    #[error("File is empty: {path}")]
    Empty { path: PathBuf },

    /// The file could not be opened or read.
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Path of the file that failed to hash.
    pub fn path(&self) -> &Path {
        match self {
            Self::Empty { path } | Self::Io { path, .. } => path,
        }
    }
}

/// Per-path failure while removing a file.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (deleted or moved since the scan).
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied when attempting to delete.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Only regular files are removed.
    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Moving the file to the trash failed.
    #[error("Trash operation failed for {path}: {message}")]
    Trash { path: PathBuf, message: String },

    /// The batch was cancelled before this path was attempted.
    #[error("Cancelled before deleting {path}")]
    Cancelled { path: PathBuf },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::NotAFile { path }
            | Self::Trash { path, .. }
            | Self::Cancelled { path }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Per-path failure while renaming a file with a prefix.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The destination already exists; nothing was overwritten.
    #[error("Cannot rename {from}: {to} already exists")]
    Collision { from: PathBuf, to: PathBuf },

    /// The prefix cannot be used as part of a file name.
    #[error("Invalid prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// File was not found.
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied when attempting to rename.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Only regular files are renamed.
    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// The batch was cancelled before this path was attempted.
    #[error("Cancelled before renaming {path}")]
    Cancelled { path: PathBuf },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RenameError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Returned when a cooperative cancellation point observes a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Operation cancelled")]
pub struct Cancelled;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));
        assert_eq!(err.path(), Some(Path::new("/test/path")));
    }

    #[test]
    fn test_delete_error_io_maps_not_found() {
        let err = DeleteError::io("/gone", io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(matches!(err, DeleteError::NotFound { .. }));
        assert_eq!(err.path(), Path::new("/gone"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_cancelled_into_scan_error() {
        let err: ScanError = Cancelled.into();
        assert!(matches!(err, ScanError::Interrupted));
    }
}
