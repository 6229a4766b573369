//! Progress reporting types for file operations.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::OperationError;

/// The type of operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Delete,
    Rename,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => write!(f, "Delete"),
            Self::Rename => write!(f, "Rename"),
        }
    }
}

/// Progress information for an ongoing operation.
#[derive(Debug, Clone)]
pub struct OperationProgress {
    /// The type of operation.
    pub operation_type: OperationType,
    /// Number of paths attempted so far.
    pub files_completed: usize,
    /// Total number of paths in the batch.
    pub files_total: usize,
    /// Bytes removed so far.
    pub bytes_processed: u64,
    /// The file currently being processed.
    pub current_file: Option<PathBuf>,
    /// Errors encountered so far.
    pub errors: Vec<OperationError>,
}

impl OperationProgress {
    /// Create a new progress tracker for an operation.
    pub fn new(operation_type: OperationType, files_total: usize) -> Self {
        Self {
            operation_type,
            files_completed: 0,
            files_total,
            bytes_processed: 0,
            current_file: None,
            errors: Vec::new(),
        }
    }

    /// Get the progress as a percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.files_total > 0 {
            (self.files_completed as f64 / self.files_total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Check if the operation has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Update the current file being processed.
    pub fn set_current_file(&mut self, path: Option<PathBuf>) {
        self.current_file = path;
    }

    /// Record one attempted path.
    pub fn complete_file(&mut self, bytes: u64) {
        self.files_completed += 1;
        self.bytes_processed += bytes;
    }

    /// Record one failed path.
    pub fn fail_file(&mut self, error: OperationError) {
        self.files_completed += 1;
        self.errors.push(error);
    }
}

/// Outcome of a whole batch: what succeeded and why the rest failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationComplete {
    /// The type of operation.
    pub operation_type: OperationType,
    /// Paths that were removed or renamed, in attempt order.
    pub succeeded: Vec<PathBuf>,
    /// `(old, new)` pairs for renames; empty for deletions.
    pub renamed: Vec<(PathBuf, PathBuf)>,
    /// Bytes removed.
    pub bytes_processed: u64,
    /// Per-path failures, in attempt order.
    pub errors: Vec<OperationError>,
}

impl OperationComplete {
    /// Create an empty outcome.
    pub fn new(operation_type: OperationType) -> Self {
        Self {
            operation_type,
            succeeded: Vec::new(),
            renamed: Vec::new(),
            bytes_processed: 0,
            errors: Vec::new(),
        }
    }

    /// Number of paths that succeeded.
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of paths that failed.
    pub fn failure_count(&self) -> usize {
        self.errors.len()
    }

    /// Check if the operation was fully successful.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get a human-readable summary of the operation.
    pub fn summary(&self) -> String {
        let action = match self.operation_type {
            OperationType::Delete => "Deleted",
            OperationType::Rename => "Renamed",
        };

        if self.is_success() {
            format!("{} {} items", action, self.success_count())
        } else {
            format!(
                "{} {} items, {} failed",
                action,
                self.success_count(),
                self.failure_count()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let mut progress = OperationProgress::new(OperationType::Delete, 4);
        assert_eq!(progress.percentage(), 0.0);

        progress.complete_file(10);
        progress.fail_file(OperationError::new(PathBuf::from("/x"), "boom"));
        assert_eq!(progress.percentage(), 50.0);
        assert!(progress.has_errors());
        assert_eq!(progress.bytes_processed, 10);
    }

    #[test]
    fn test_summary() {
        let mut done = OperationComplete::new(OperationType::Rename);
        done.succeeded.push(PathBuf::from("/a"));
        assert_eq!(done.summary(), "Renamed 1 items");

        done.errors.push(OperationError::new(PathBuf::from("/b"), "exists"));
        assert_eq!(done.summary(), "Renamed 1 items, 1 failed");
    }
}
