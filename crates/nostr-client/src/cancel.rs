//! Query deadlines and caller-driven cancellation
//!
//! Every query runs under `run_with_options`, which races the work against a
//! fixed deadline and an optional caller token. Whichever fires first wins;
//! the losing branches are dropped.

use crate::error::{ClientError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// A clone-able cancellation handle shared between a caller and the work it
/// started. Cancelling is sticky: once cancelled, a token stays cancelled.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal cancellation to every holder of this token.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves when the token is cancelled. Resolves immediately if it
    /// already was.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so wait_for cannot observe a closed
        // channel here.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Options applied to a single query.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Deadline for the whole query
    pub timeout: Duration,
    /// Optional caller token; cancellation maps to `ClientError::Cancelled`
    pub cancel: Option<CancelToken>,
}

impl QueryOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            cancel: None,
        }
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            cancel: None,
        }
    }
}

/// Race a future against the options' deadline and cancel token.
///
/// Deadline expiry maps to `ClientError::Timeout`, token cancellation to
/// `ClientError::Cancelled`. A token that is already cancelled wins before
/// any work is polled.
pub async fn run_with_options<T, F>(options: &QueryOptions, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if let Some(token) = &options.cancel
        && token.is_cancelled()
    {
        return Err(ClientError::Cancelled);
    }

    match &options.cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(ClientError::Cancelled),
                _ = tokio::time::sleep(options.timeout) => Err(ClientError::Timeout(options.timeout)),
                result = fut => result,
            }
        }
        None => tokio::time::timeout(options.timeout, fut)
            .await
            .map_err(|_| ClientError::Timeout(options.timeout))?,
    }
}
