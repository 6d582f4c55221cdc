//! # Askboard
//!
//! Terminal client for a natural-language sales analytics backend. Questions
//! go to `POST /ask`; the reply is classified and drawn as a chart, a table
//! or a forecast with confidence bounds.
//!
//! ## Modules
//!
//! - [`payload`]: Wire types of the backend API
//! - [`client`]: REST client and the [`Backend`] trait
//! - [`state`]: Shared UI state with stale-result discarding
//! - [`session`]: Submission rules and request dispatch
//! - [`view`]: Classification of responses into renderable views
//! - [`render`]: Terminal rendering of views
//! - [`stub`]: Scripted stand-in backend
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use askboard::{BackendClient, Config, ResponseView, Session, TextRenderer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = BackendClient::new(&config.backend)?;
//!     let session = Session::new(client, config.ui.examples.clone());
//!
//!     session.select_example(0).await?;
//!     session.submit().await;
//!
//!     if let Some(view) = session.view().await {
//!         print!("{}", TextRenderer::from_config(&config.ui).render(&view));
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod logging;
pub mod payload;
pub mod render;
pub mod session;
pub mod state;
pub mod stub;
pub mod view;

pub use client::{Backend, BackendClient, ClientError, ErrorKind, FALLBACK_ERROR_MESSAGE};

pub use config::{BackendConfig, Config, ConfigError, LoggingConfig, UiConfig};

pub use payload::{
    AskRequest, AskResponse, ChartKind, ForecastPoint, HealthStatus, Intent, TableResult,
    TrainStatus,
};

pub use render::TextRenderer;

pub use session::{Session, SessionError, SubmitOutcome};

pub use state::{RequestToken, SessionState, UiState};

pub use stub::{build_stub_router, serve_stub, spawn_stub, StubReply, StubScript, StubState};

pub use view::{ChartSpec, ForecastChart, IntentBadge, ResponseView, ResultView, TableView};
