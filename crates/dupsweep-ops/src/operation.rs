//! File operation types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A batch operation requested by the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileOperation {
    /// Remove files, recording `method` in the audit trail.
    Delete {
        targets: Vec<PathBuf>,
        method: String,
    },
    /// Rename files in place by prepending a prefix to their names.
    Rename {
        sources: Vec<PathBuf>,
        prefix: String,
    },
}

impl FileOperation {
    /// Create a delete operation.
    pub fn delete(targets: Vec<PathBuf>, method: impl Into<String>) -> Self {
        Self::Delete {
            targets,
            method: method.into(),
        }
    }

    /// Create a rename operation.
    pub fn rename(sources: Vec<PathBuf>, prefix: impl Into<String>) -> Self {
        Self::Rename {
            sources,
            prefix: prefix.into(),
        }
    }

    /// Paths the operation will touch.
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Self::Delete { targets, .. } => targets,
            Self::Rename { sources, .. } => sources,
        }
    }
}

/// An error that occurred for one path of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// The path that caused the error.
    pub path: PathBuf,
    /// A human-readable error message.
    pub message: String,
}

impl OperationError {
    /// Create a new operation error.
    pub fn new(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
