//! Session State
//!
//! UI state shared between the input loop and in-flight requests.
//!
//! Requests are not cancelled when a newer one starts. Instead each dispatch
//! takes a [`RequestToken`] from a monotonically increasing counter and only
//! the result carrying the latest token is applied; anything older is dropped
//! when it arrives. The loading flag therefore clears exactly once, when the
//! latest request settles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::ClientError;
use crate::payload::{AskResponse, TrainStatus};

/// Generation of a dispatched request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Snapshot of everything the view reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Current input text
    pub query: String,
    /// Last successfully received response
    pub response: Option<AskResponse>,
    /// An `/ask` request is outstanding
    pub loading: bool,
    /// Message of the last failed `/ask` request
    pub error: Option<String>,
    /// Result of the last training request
    pub train_status: Option<TrainStatus>,
    /// A `/train_forecast` request is outstanding
    pub training: bool,
    pub train_error: Option<String>,
}

/// Shared, cloneable handle to the UI state
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<UiState>>,
    ask_generation: Arc<AtomicU64>,
    train_generation: Arc<AtomicU64>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> UiState {
        self.inner.read().await.clone()
    }

    pub async fn set_query(&self, query: impl Into<String>) {
        self.inner.write().await.query = query.into();
    }

    pub async fn query(&self) -> String {
        self.inner.read().await.query.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.loading
    }

    /// Start an `/ask` dispatch: set loading, clear the error, keep the last response
    pub async fn begin_ask(&self) -> RequestToken {
        let mut state = self.inner.write().await;
        let token = RequestToken(self.ask_generation.fetch_add(1, Ordering::SeqCst) + 1);
        state.loading = true;
        state.error = None;
        tracing::debug!(generation = token.0, "Ask dispatched");
        token
    }

    /// Apply the outcome of an `/ask` dispatch.
    ///
    /// Returns `false` and leaves the state untouched when a newer dispatch
    /// has started since `token` was issued.
    pub async fn finish_ask(
        &self,
        token: RequestToken,
        outcome: Result<AskResponse, ClientError>,
    ) -> bool {
        let mut state = self.inner.write().await;
        let latest = self.ask_generation.load(Ordering::SeqCst);
        if token.0 != latest {
            tracing::debug!(generation = token.0, latest, "Discarding stale ask result");
            return false;
        }

        match outcome {
            Ok(response) => {
                state.response = Some(response);
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(generation = token.0, error = %e, "Ask failed");
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
        true
    }

    /// Start a `/train_forecast` dispatch
    pub async fn begin_train(&self) -> RequestToken {
        let mut state = self.inner.write().await;
        let token = RequestToken(self.train_generation.fetch_add(1, Ordering::SeqCst) + 1);
        state.training = true;
        state.train_error = None;
        token
    }

    /// Apply the outcome of a `/train_forecast` dispatch; stale results are dropped
    pub async fn finish_train(
        &self,
        token: RequestToken,
        outcome: Result<TrainStatus, ClientError>,
    ) -> bool {
        let mut state = self.inner.write().await;
        if token.0 != self.train_generation.load(Ordering::SeqCst) {
            tracing::debug!(generation = token.0, "Discarding stale train result");
            return false;
        }

        match outcome {
            Ok(status) => {
                state.train_status = Some(status);
                state.train_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Training request failed");
                state.train_error = Some(e.to_string());
            }
        }
        state.training = false;
        true
    }
}
