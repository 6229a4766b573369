//! Async operation executor with streamed progress.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use dupsweep_core::{DeleteError, RenameError};

use crate::delete::SafeDeleter;
use crate::operation::{FileOperation, OperationError};
use crate::progress::{OperationComplete, OperationProgress, OperationType};
use crate::OPERATION_CHANNEL_SIZE;

/// Unified result type for all operations.
#[derive(Debug)]
pub enum OperationResult {
    /// Progress update.
    Progress(OperationProgress),
    /// The operation completed.
    Complete(OperationComplete),
}

/// Runs delete and rename batches on the tokio runtime.
///
/// Each file is handled on the blocking pool. A progress update is sent
/// before and after every file and the stream ends with a single
/// [`OperationResult::Complete`].
#[derive(Debug, Clone)]
pub struct OperationExecutor {
    deleter: SafeDeleter,
}

impl OperationExecutor {
    /// Create an executor around `deleter`.
    pub fn new(deleter: SafeDeleter) -> Self {
        Self { deleter }
    }

    /// The deleter used for each file.
    pub fn deleter(&self) -> &SafeDeleter {
        &self.deleter
    }

    /// Execute any batch operation.
    pub fn execute(
        &self,
        operation: FileOperation,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<OperationResult> {
        match operation {
            FileOperation::Delete { targets, method } => self.delete(targets, method, cancel),
            FileOperation::Rename { sources, prefix } => self.rename(sources, prefix, cancel),
        }
    }

    /// Start deleting `paths`, tagging audit records with `method`.
    pub fn delete(
        &self,
        paths: Vec<PathBuf>,
        method: impl Into<String>,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<OperationResult> {
        let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);
        let deleter = self.deleter.clone();
        let method = method.into();

        tokio::spawn(async move {
            delete_impl(deleter, paths, method, cancel, tx).await;
        });

        rx
    }

    /// Start renaming `paths` to `<prefix>_<name>`.
    pub fn rename(
        &self,
        paths: Vec<PathBuf>,
        prefix: impl Into<String>,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<OperationResult> {
        let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);
        let deleter = self.deleter.clone();
        let prefix = prefix.into();

        tokio::spawn(async move {
            rename_impl(deleter, paths, prefix, cancel, tx).await;
        });

        rx
    }
}

async fn delete_impl(
    deleter: SafeDeleter,
    paths: Vec<PathBuf>,
    method: String,
    cancel: CancellationToken,
    tx: mpsc::Sender<OperationResult>,
) {
    let mut progress = OperationProgress::new(OperationType::Delete, paths.len());
    let mut outcome = OperationComplete::new(OperationType::Delete);

    for path in paths {
        if cancel.is_cancelled() {
            let err = OperationError::new(path.clone(), DeleteError::Cancelled { path }.to_string());
            progress.fail_file(err.clone());
            outcome.errors.push(err);
            continue;
        }

        progress.set_current_file(Some(path.clone()));
        let _ = tx.send(OperationResult::Progress(progress.clone())).await;

        let worker = deleter.clone();
        let target = path.clone();
        let method = method.clone();
        let result = tokio::task::spawn_blocking(move || worker.delete_one(&target, &method))
            .await
            .map_err(|e| format!("Task failed: {}", e));

        match result {
            Ok(Ok(bytes)) => {
                progress.complete_file(bytes);
                outcome.bytes_processed += bytes;
                outcome.succeeded.push(path);
            }
            Ok(Err(e)) => {
                warn!(path = %path.display(), error = %e, "delete failed");
                let err = OperationError::new(path, e.to_string());
                progress.fail_file(err.clone());
                outcome.errors.push(err);
            }
            Err(e) => {
                let err = OperationError::new(path, e);
                progress.fail_file(err.clone());
                outcome.errors.push(err);
            }
        }

        let _ = tx.send(OperationResult::Progress(progress.clone())).await;
    }

    info!("{}", outcome.summary());
    let _ = tx.send(OperationResult::Complete(outcome)).await;
}

async fn rename_impl(
    deleter: SafeDeleter,
    paths: Vec<PathBuf>,
    prefix: String,
    cancel: CancellationToken,
    tx: mpsc::Sender<OperationResult>,
) {
    let mut progress = OperationProgress::new(OperationType::Rename, paths.len());
    let mut outcome = OperationComplete::new(OperationType::Rename);

    for path in paths {
        if cancel.is_cancelled() {
            let err = OperationError::new(path.clone(), RenameError::Cancelled { path }.to_string());
            progress.fail_file(err.clone());
            outcome.errors.push(err);
            continue;
        }

        progress.set_current_file(Some(path.clone()));
        let _ = tx.send(OperationResult::Progress(progress.clone())).await;

        let worker = deleter.clone();
        let source = path.clone();
        let prefix = prefix.clone();
        let result = tokio::task::spawn_blocking(move || worker.rename_one(&source, &prefix))
            .await
            .map_err(|e| format!("Task failed: {}", e));

        match result {
            Ok(Ok(target)) => {
                progress.complete_file(0);
                outcome.succeeded.push(path.clone());
                outcome.renamed.push((path, target));
            }
            Ok(Err(e)) => {
                warn!(path = %path.display(), error = %e, "rename failed");
                let err = OperationError::new(path, e.to_string());
                progress.fail_file(err.clone());
                outcome.errors.push(err);
            }
            Err(e) => {
                let err = OperationError::new(path, e);
                progress.fail_file(err.clone());
                outcome.errors.push(err);
            }
        }

        let _ = tx.send(OperationResult::Progress(progress.clone())).await;
    }

    info!("{}", outcome.summary());
    let _ = tx.send(OperationResult::Complete(outcome)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeletionAuditLog;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn drain(mut rx: mpsc::Receiver<OperationResult>) -> (Vec<OperationProgress>, OperationComplete) {
        let mut updates = Vec::new();
        while let Some(result) = rx.recv().await {
            match result {
                OperationResult::Progress(p) => updates.push(p),
                OperationResult::Complete(c) => return (updates, c),
            }
        }
        panic!("stream ended without completion");
    }

    fn executor() -> OperationExecutor {
        OperationExecutor::new(SafeDeleter::new(Arc::new(DeletionAuditLog::new())))
    }

    #[tokio::test]
    async fn test_delete_streams_progress() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::write(&a, "aa").unwrap();
        fs::write(&b, "bbb").unwrap();

        let executor = executor();
        let rx = executor.delete(vec![a.clone(), b.clone()], "duplicates", CancellationToken::new());
        let (updates, complete) = drain(rx).await;

        assert_eq!(complete.succeeded, vec![a.clone(), b.clone()]);
        assert_eq!(complete.bytes_processed, 5);
        assert_eq!(updates.len(), 4);
        assert_eq!(updates.last().unwrap().percentage(), 100.0);
        assert!(!a.exists() && !b.exists());
        assert_eq!(executor.deleter().audit_log().len(), 2);
    }

    #[tokio::test]
    async fn test_rename_via_execute() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        fs::write(&a, "a").unwrap();

        let executor = executor();
        let rx = executor.execute(FileOperation::rename(vec![a.clone()], "bak"), CancellationToken::new());
        let (_, complete) = drain(rx).await;

        let target = temp.path().join("bak_a.txt");
        assert_eq!(complete.renamed, vec![(a.clone(), target.clone())]);
        assert!(!a.exists());
        assert!(target.exists());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        fs::write(&a, "a").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let rx = executor().delete(vec![a.clone()], "duplicates", cancel);
        let (_, complete) = drain(rx).await;

        assert_eq!(complete.failure_count(), 1);
        assert!(a.exists());
    }
}
