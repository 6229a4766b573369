//! Cancellable background work.

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The background task did not produce a value.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The worker panicked.
    #[error("Background task panicked: {0}")]
    Panicked(String),

    /// The runtime dropped the task before it ran to completion.
    #[error("Background task was aborted")]
    Aborted,
}

/// Blocking work running on the tokio blocking pool, paired with the token
/// it polls between files.
///
/// Cancelling does not stop the worker abruptly. The worker notices the
/// token at its next check and returns its own interrupted result, which
/// [`join`](Self::join) then yields.
#[derive(Debug)]
pub struct BackgroundTask<T> {
    handle: JoinHandle<T>,
    cancel: CancellationToken,
}

impl<T: Send + 'static> BackgroundTask<T> {
    /// Run `work` on the blocking pool with a fresh cancellation token.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce(CancellationToken) -> T + Send + 'static,
    {
        Self::spawn_with_token(CancellationToken::new(), work)
    }

    /// Run `work` on the blocking pool, observing `cancel`.
    pub fn spawn_with_token<F>(cancel: CancellationToken, work: F) -> Self
    where
        F: FnOnce(CancellationToken) -> T + Send + 'static,
    {
        let token = cancel.clone();
        let handle = tokio::task::spawn_blocking(move || work(token));
        Self { handle, cancel }
    }

    /// Ask the worker to stop at its next cancellation point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The token handed to the worker.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Check whether the worker has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker's result.
    pub async fn join(self) -> Result<T, TaskError> {
        self.handle.await.map_err(|err| {
            if err.is_panic() {
                TaskError::Panicked(err.to_string())
            } else {
                TaskError::Aborted
            }
        })
    }
}
