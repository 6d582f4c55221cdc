//! Interactive Session
//!
//! Couples the input state, the example chips and a [`Backend`]. This is the
//! request dispatcher: it decides whether a submission may go out, issues the
//! call and routes the outcome into [`SessionState`].

use std::sync::Arc;
use thiserror::Error;

use crate::client::Backend;
use crate::state::{SessionState, UiState};
use crate::view::ResponseView;

/// What happened to a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent: the input was empty or whitespace
    Rejected,
    /// Nothing was sent: a request is already outstanding
    Busy,
    /// The request settled and its result is now shown
    Applied,
    /// The request settled after a newer one was dispatched; its result was dropped
    Superseded,
}

/// Session errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("No example #{0}")]
    NoSuchExample(usize),
}

/// A user session against one backend
pub struct Session<B> {
    backend: Arc<B>,
    state: SessionState,
    examples: Arc<Vec<String>>,
}

impl<B> Clone for Session<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: self.state.clone(),
            examples: Arc::clone(&self.examples),
        }
    }
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B, examples: Vec<String>) -> Self {
        Self {
            backend: Arc::new(backend),
            state: SessionState::new(),
            examples: Arc::new(examples),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Example questions offered as chips
    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    pub async fn set_query(&self, query: impl Into<String>) {
        self.state.set_query(query).await;
    }

    /// Put the example at `index` into the input. Sends nothing.
    pub async fn select_example(&self, index: usize) -> Result<String, SessionError> {
        let example = self
            .examples
            .get(index)
            .cloned()
            .ok_or(SessionError::NoSuchExample(index + 1))?;
        self.state.set_query(example.clone()).await;
        Ok(example)
    }

    /// Whether the submit action is enabled
    pub async fn can_submit(&self) -> bool {
        let state = self.state.snapshot().await;
        !state.loading && !state.query.trim().is_empty()
    }

    /// Submit the current input, unless it is blank or a request is outstanding
    pub async fn submit(&self) -> SubmitOutcome {
        let state = self.state.snapshot().await;
        if state.query.trim().is_empty() {
            return SubmitOutcome::Rejected;
        }
        if state.loading {
            return SubmitOutcome::Busy;
        }
        self.dispatch(&state.query).await
    }

    /// Send `question` regardless of outstanding requests.
    ///
    /// Concurrent dispatches race; only the most recently started one is applied.
    pub async fn dispatch(&self, question: &str) -> SubmitOutcome {
        let question = question.trim();
        if question.is_empty() {
            return SubmitOutcome::Rejected;
        }

        let token = self.state.begin_ask().await;
        tracing::info!(
            generation = token.generation(),
            question = %question,
            "Submitting question"
        );

        let outcome = self.backend.ask(question).await;
        if self.state.finish_ask(token, outcome).await {
            SubmitOutcome::Applied
        } else {
            SubmitOutcome::Superseded
        }
    }

    /// Ask the backend to train its forecast model. Only runs when called explicitly.
    pub async fn train(&self) -> SubmitOutcome {
        let token = self.state.begin_train().await;
        tracing::info!("Requesting forecast model training");

        let outcome = self.backend.train_forecast().await;
        if self.state.finish_train(token, outcome).await {
            SubmitOutcome::Applied
        } else {
            SubmitOutcome::Superseded
        }
    }

    pub async fn snapshot(&self) -> UiState {
        self.state.snapshot().await
    }

    /// View of the last successful response
    pub async fn view(&self) -> Option<ResponseView> {
        self.state
            .snapshot()
            .await
            .response
            .as_ref()
            .map(ResponseView::from_payload)
    }
}
