//! Stub Backend
//!
//! A scripted stand-in for the query/forecast backend, built with Axum.
//! Used by the integration tests and for offline demos.
//!
//! # Endpoints
//!
//! - `POST /ask` - Answer a question from the script
//! - `POST /train_forecast` - Report a canned training run
//! - `GET /forecast?periods=N` - N days of synthetic forecast points
//! - `GET /health` - Health status
//! - `GET /debug/stats` - Row counts per table
//! - `GET /debug/sales-data` - Sample of the training data

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::payload::AskRequest;

/// How one endpoint answers
#[derive(Debug, Clone)]
pub enum StubReply {
    /// 200 with a JSON body
    Json(Value),
    /// Bare status code with an empty body
    Status(u16),
    /// 200 with a body that is served as JSON but may not parse
    Raw(String),
}

impl StubReply {
    fn into_response(self) -> Response {
        match self {
            StubReply::Json(value) => Json(value).into_response(),
            StubReply::Status(code) => StatusCode::from_u16(code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response(),
            StubReply::Raw(body) => {
                ([(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
        }
    }
}

/// Canned replies per endpoint.
///
/// `/ask` picks the first route whose keyword occurs in the question
/// (case-insensitive) and falls back to `ask_default`. `forecast` overrides
/// the synthetic `/forecast` series when set.
#[derive(Debug, Clone)]
pub struct StubScript {
    pub ask_routes: Vec<(String, StubReply)>,
    pub ask_default: StubReply,
    pub train: StubReply,
    pub forecast: Option<StubReply>,
    pub health: StubReply,
    pub stats: StubReply,
    pub sales: StubReply,
}

impl Default for StubScript {
    fn default() -> Self {
        Self::demo()
    }
}

impl StubScript {
    /// Sales demo: monthly bars, a pie by category, a 30-day forecast
    pub fn demo() -> Self {
        Self {
            ask_routes: vec![
                ("forecast".to_string(), StubReply::Json(demo_forecast_answer(30))),
                ("category".to_string(), StubReply::Json(demo_category_answer())),
                ("customer".to_string(), StubReply::Json(demo_customer_answer())),
            ],
            ask_default: StubReply::Json(demo_monthly_answer()),
            train: StubReply::Json(json!({
                "success": true,
                "message": "Forecast model trained successfully",
                "rows": 480,
                "date_range": {"start": "1996-07-04", "end": "1998-05-06"}
            })),
            forecast: None,
            health: StubReply::Json(json!({"status": "healthy", "database": "connected"})),
            stats: StubReply::Json(json!({"orders": 830, "order_details": 2155, "products": 77})),
            sales: StubReply::Json(json!({
                "success": true,
                "data_count": 480,
                "sample_data": [
                    {"ds": "1996-07-04", "y": 440.0},
                    {"ds": "1996-07-05", "y": 1863.4},
                    {"ds": "1996-07-08", "y": 2206.66}
                ]
            })),
        }
    }

    /// Answer every question with the same reply
    pub fn answering(reply: StubReply) -> Self {
        Self {
            ask_routes: Vec::new(),
            ask_default: reply,
            ..Self::demo()
        }
    }

    pub fn route(mut self, keyword: impl Into<String>, reply: StubReply) -> Self {
        self.ask_routes.push((keyword.into().to_lowercase(), reply));
        self
    }

    pub fn with_train(mut self, reply: StubReply) -> Self {
        self.train = reply;
        self
    }

    pub fn with_forecast(mut self, reply: StubReply) -> Self {
        self.forecast = Some(reply);
        self
    }

    fn answer(&self, question: &str) -> StubReply {
        let question = question.to_lowercase();
        self.ask_routes
            .iter()
            .find(|(keyword, _)| question.contains(keyword.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.ask_default.clone())
    }
}

/// Shared stub state: the script plus a log of received questions
#[derive(Debug, Default)]
pub struct StubState {
    script: StubScript,
    questions: RwLock<Vec<String>>,
    train_calls: RwLock<usize>,
}

impl StubState {
    pub fn new(script: StubScript) -> Self {
        Self {
            script,
            questions: RwLock::new(Vec::new()),
            train_calls: RwLock::new(0),
        }
    }

    /// Questions received on `/ask`, in arrival order
    pub async fn questions(&self) -> Vec<String> {
        self.questions.read().await.clone()
    }

    pub async fn train_calls(&self) -> usize {
        *self.train_calls.read().await
    }
}

/// Build the stub router
pub fn build_stub_router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/train_forecast", post(train_forecast))
        .route("/forecast", get(forecast))
        .route("/health", get(health))
        .route("/debug/stats", get(stats))
        .route("/debug/sales-data", get(sales_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the stub on `addr` until Ctrl+C
pub async fn serve_stub(script: StubScript, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Stub backend listening on {}", listener.local_addr()?);

    let router = build_stub_router(Arc::new(StubState::new(script)));
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Stub backend shut down");
    Ok(())
}

/// Bind an ephemeral local port and serve the stub in the background.
///
/// Returns the bound address and the shared state for inspection.
pub async fn spawn_stub(script: StubScript) -> std::io::Result<(SocketAddr, Arc<StubState>)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = Arc::new(StubState::new(script));
    let router = build_stub_router(Arc::clone(&state));

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Stub backend stopped");
        }
    });

    Ok((addr, state))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

async fn ask(State(state): State<Arc<StubState>>, Json(request): Json<AskRequest>) -> Response {
    tracing::debug!(question = %request.question, "Stub received question");
    state.questions.write().await.push(request.question.clone());
    state.script.answer(&request.question).into_response()
}

async fn train_forecast(State(state): State<Arc<StubState>>) -> Response {
    *state.train_calls.write().await += 1;
    state.script.train.clone().into_response()
}

#[derive(Debug, Deserialize)]
struct ForecastParams {
    periods: Option<u32>,
}

async fn forecast(
    State(state): State<Arc<StubState>>,
    Query(params): Query<ForecastParams>,
) -> Response {
    match &state.script.forecast {
        Some(reply) => reply.clone().into_response(),
        None => Json(synthetic_forecast(params.periods.unwrap_or(30))).into_response(),
    }
}

async fn health(State(state): State<Arc<StubState>>) -> Response {
    state.script.health.clone().into_response()
}

async fn stats(State(state): State<Arc<StubState>>) -> Response {
    state.script.stats.clone().into_response()
}

async fn sales_data(State(state): State<Arc<StubState>>) -> Response {
    state.script.sales.clone().into_response()
}

/// Day after the last training date of the demo data
fn forecast_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1998, 5, 7).unwrap_or_default()
}

/// Deterministic forecast points: gentle upward trend with a weekly wobble
pub fn synthetic_forecast(periods: u32) -> Value {
    let start = forecast_start();
    let points: Vec<Value> = (0..periods)
        .map(|i| {
            let day = start + Duration::days(i64::from(i));
            let wobble = [0.0, 120.0, 60.0, -40.0, -90.0, 30.0, 80.0][(i % 7) as usize];
            let yhat = 2100.0 + 12.5 * f64::from(i) + wobble;
            let spread = 350.0 + 4.0 * f64::from(i);
            json!({
                "ds": day.format("%Y-%m-%d").to_string(),
                "yhat": yhat,
                "yhat_lower": yhat - spread,
                "yhat_upper": yhat + spread,
            })
        })
        .collect();
    Value::Array(points)
}

fn demo_forecast_answer(periods: u32) -> Value {
    json!({
        "question": "Forecast sales for next 30 days",
        "intent": "Forecasting",
        "sql": null,
        "chart": "line",
        "result": synthetic_forecast(periods),
        "forecast_summary": "Sales are expected to rise slowly over the next month.\nWeekends stay stronger than mid-week.",
        "message": ""
    })
}

fn demo_monthly_answer() -> Value {
    let months = [
        ("1997-01", 61258.07),
        ("1997-02", 38483.63),
        ("1997-03", 38547.22),
        ("1997-04", 53032.95),
        ("1997-05", 53781.29),
        ("1997-06", 36362.80),
    ];
    let rows: Vec<Value> = months
        .iter()
        .map(|(month, total)| json!({"month": month, "total_sales": total}))
        .collect();
    json!({
        "question": "Show total sales by month",
        "intent": "Historical",
        "sql": "SELECT strftime('%Y-%m', o.order_date) AS month,\n       SUM(d.unit_price * d.quantity) AS total_sales\nFROM orders o JOIN order_details d ON d.order_id = o.order_id\nGROUP BY month\nORDER BY month",
        "chart": "bar",
        "result": {"columns": ["month", "total_sales"], "rows": rows},
        "forecast_summary": null,
        "message": ""
    })
}

fn demo_category_answer() -> Value {
    json!({
        "question": "Sales share by category",
        "intent": "Historical",
        "sql": "SELECT c.category_name, SUM(d.unit_price * d.quantity) AS sales\nFROM order_details d JOIN products p USING (product_id) JOIN categories c USING (category_id)\nGROUP BY c.category_name",
        "chart": "pie",
        "result": {
            "columns": ["category_name", "sales"],
            "rows": [
                {"category_name": "Beverages", "sales": 286526.95},
                {"category_name": "Dairy Products", "sales": 251330.50},
                {"category_name": "Confections", "sales": 177099.10},
                {"category_name": "Meat/Poultry", "sales": 178188.80}
            ]
        },
        "message": ""
    })
}

fn demo_customer_answer() -> Value {
    json!({
        "question": "Top customers",
        "intent": "Historical",
        "sql": "SELECT company_name, country, region FROM customers LIMIT 3",
        "chart": "table",
        "result": {
            "columns": ["company_name", "country", "region"],
            "rows": [
                {"company_name": "Alfreds Futterkiste", "country": "Germany", "region": null},
                {"company_name": "Great Lakes Food Market", "country": "USA", "region": "OR"},
                {"company_name": "Hungry Owl All-Night Grocers", "country": "Ireland", "region": "Co. Cork"}
            ]
        },
        "message": ""
    })
}
