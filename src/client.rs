//! Backend REST Client
//!
//! HTTP client for the natural-language query/forecast backend.
//!
//! Each call is a single request: no retry, no cancellation, and no timeout
//! unless one is configured. Failures collapse into two kinds, see
//! [`ClientError`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::BackendConfig;
use crate::payload::{
    AskRequest, AskResponse, ForecastPoint, HealthStatus, SalesSample, TableStats, TrainStatus,
};

/// Message used when a transport failure carries no text of its own
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// The two operations the interactive session dispatches
#[async_trait]
pub trait Backend: Send + Sync {
    /// Ask a natural-language question
    async fn ask(&self, question: &str) -> Result<AskResponse, ClientError>;

    /// Ask the backend to (re)train its forecast model
    async fn train_forecast(&self) -> Result<TrainStatus, ClientError>;
}

/// REST client for the backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client from configuration
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ClientError::from)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check backend and database connectivity
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.send_json(self.client.get(self.url("/health"))).await
    }

    /// Fetch a raw forecast for the next `periods` days
    pub async fn forecast(&self, periods: u32) -> Result<Vec<ForecastPoint>, ClientError> {
        let request = self
            .client
            .get(self.url("/forecast"))
            .query(&[("periods", periods)]);
        self.send_json(request).await
    }

    /// Row counts of the tables the forecast model trains on
    pub async fn table_stats(&self) -> Result<TableStats, ClientError> {
        self.send_json(self.client.get(self.url("/debug/stats"))).await
    }

    /// First rows of the daily sales series used for training
    pub async fn sales_sample(&self) -> Result<SalesSample, ClientError> {
        self.send_json(self.client.get(self.url("/debug/sales-data"))).await
    }

    /// Send a request and decode a JSON body from a 2xx response.
    ///
    /// Non-2xx responses fail with [`ClientError::Http`] without reading the body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Backend request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                url = %response.url(),
                "Backend returned error status"
            );
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to decode backend response");
            ClientError::from(e)
        })
    }
}

#[async_trait]
impl Backend for BackendClient {
    async fn ask(&self, question: &str) -> Result<AskResponse, ClientError> {
        tracing::debug!(question = %question, "POST /ask");
        let request = self
            .client
            .post(self.url("/ask"))
            .json(&AskRequest::new(question));
        self.send_json(request).await
    }

    async fn train_forecast(&self) -> Result<TrainStatus, ClientError> {
        tracing::debug!("POST /train_forecast");
        self.send_json(self.client.post(self.url("/train_forecast"))).await
    }
}

/// Which of the two failure kinds an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend answered with a non-2xx status
    HttpStatus,
    /// The request never completed or the body was not valid JSON
    Transport,
}

/// Errors that can occur when calling the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    #[error("{message}")]
    Transport { message: String },
}

impl ClientError {
    /// Transport error with the given message, or the fallback when it is blank
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            ClientError::Transport {
                message: FALLBACK_ERROR_MESSAGE.to_string(),
            }
        } else {
            ClientError::Transport { message }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Http { .. } => ErrorKind::HttpStatus,
            ClientError::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// HTTP status code, for status errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status } => Some(*status),
            ClientError::Transport { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::transport(e.to_string())
    }
}
