//! Integration tests: the real HTTP client against the stub backend

use askboard::client::{Backend, BackendClient, ClientError, ErrorKind};
use askboard::config::BackendConfig;
use askboard::session::{Session, SubmitOutcome};
use askboard::stub::{spawn_stub, StubReply, StubScript};
use askboard::view::{ChartSpec, ResultView};
use serde_json::json;

async fn client_for(script: StubScript) -> (BackendClient, std::sync::Arc<askboard::StubState>) {
    let (addr, state) = spawn_stub(script).await.unwrap();
    let config = BackendConfig {
        base_url: format!("http://{}/", addr),
        request_timeout_secs: Some(5),
    };
    (BackendClient::new(&config).unwrap(), state)
}

#[tokio::test]
async fn test_ask_bar_chart() {
    let (client, stub) = client_for(StubScript::demo()).await;

    let response = client.ask("Show total sales by month").await.unwrap();
    assert_eq!(response.chart.as_ref().map(|c| c.as_str()), Some("bar"));

    let view = askboard::ResponseView::from_payload(&response);
    match view.result {
        ResultView::Chart(ChartSpec::Bar(series)) => {
            assert_eq!(series.category_axis, "month");
            assert_eq!(series.points.len(), 6);
        }
        other => panic!("unexpected view: {:?}", other),
    }
    assert_eq!(stub.questions().await, vec!["Show total sales by month"]);
}

#[tokio::test]
async fn test_http_error_keeps_previous_response() {
    let script = StubScript::demo().route("broken", StubReply::Status(500));
    let (client, _stub) = client_for(script).await;
    let session = Session::new(client, Vec::new());

    session.set_query("Show total sales by month").await;
    assert_eq!(session.submit().await, SubmitOutcome::Applied);

    session.set_query("broken question").await;
    assert_eq!(session.submit().await, SubmitOutcome::Applied);

    let state = session.snapshot().await;
    assert_eq!(state.error.as_deref(), Some("HTTP error! status: 500"));
    assert!(!state.loading);
    assert_eq!(
        state.response.unwrap().question.as_deref(),
        Some("Show total sales by month")
    );
}

#[tokio::test]
async fn test_invalid_json_is_transport_error() {
    let script = StubScript::answering(StubReply::Raw("<html>oops</html>".to_string()));
    let (client, _stub) = client_for(script).await;

    let err = client.ask("anything").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.status().is_none());
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = BackendClient::new(&BackendConfig {
        base_url: format!("http://{}", addr),
        request_timeout_secs: Some(5),
    })
    .unwrap();

    let err = client.ask("anything").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }));
}

#[tokio::test]
async fn test_train_forecast() {
    let (client, stub) = client_for(StubScript::demo()).await;

    let status = client.train_forecast().await.unwrap();
    assert_eq!(status.success, Some(true));
    assert_eq!(status.rows, Some(480));
    assert_eq!(stub.train_calls().await, 1);
}

#[tokio::test]
async fn test_train_failure_status() {
    let script = StubScript::demo().with_train(StubReply::Status(503));
    let (client, _stub) = client_for(script).await;

    let err = client.train_forecast().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_ask_does_not_train() {
    let (client, stub) = client_for(StubScript::demo()).await;
    let session = Session::new(client, Vec::new());

    session.set_query("Forecast sales for next 30 days").await;
    session.submit().await;

    let view = session.view().await.unwrap();
    assert!(matches!(view.result, ResultView::Forecast(_)));
    assert_eq!(view.summary.len(), 2);
    assert_eq!(stub.train_calls().await, 0);
}

#[tokio::test]
async fn test_forecast_endpoint() {
    let (client, _stub) = client_for(StubScript::demo()).await;

    let points = client.forecast(10).await.unwrap();
    assert_eq!(points.len(), 10);
    assert!(points.iter().all(|p| p.yhat_lower <= p.yhat && p.yhat <= p.yhat_upper));
}

#[tokio::test]
async fn test_forecast_message_is_notice() {
    let script = StubScript::answering(StubReply::Json(json!({
        "intent": "Forecasting",
        "chart": "line",
        "result": {"message": "No trained forecast model found."}
    })));
    let (client, _stub) = client_for(script).await;

    let response = client.ask("Forecast next week").await.unwrap();
    let view = askboard::ResponseView::from_payload(&response);
    assert_eq!(
        view.result,
        ResultView::Notice("No trained forecast model found.".to_string())
    );
}

#[tokio::test]
async fn test_diagnostics() {
    let (client, _stub) = client_for(StubScript::demo()).await;

    let health = client.health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.database.as_deref(), Some("connected"));

    let stats = client.table_stats().await.unwrap();
    assert_eq!(stats.get("orders"), Some(&830));

    let sample = client.sales_sample().await.unwrap();
    assert!(sample.success);
    assert_eq!(sample.sample_data.len(), 3);
}

#[tokio::test]
async fn test_mistyped_fields_still_render() {
    let mistyped_intent = StubReply::Json(json!({
        "intent": 7,
        "result": {"columns": ["a", "b"], "rows": []}
    }));
    let script = StubScript::answering(StubReply::Json(json!({
        "question": "Show total sales by month",
        "intent": "Historical",
        "chart": ["bar"],
        "message": {"detail": "x"},
        "result": {"columns": ["month", "total"], "rows": [{"month": "1997-01", "total": 10}]}
    })))
    .route("seven", mistyped_intent);
    let (client, _stub) = client_for(script).await;

    let response = client.ask("Show total sales by month").await.unwrap();
    assert!(response.chart.is_none());
    let view = askboard::ResponseView::from_payload(&response);
    assert!(matches!(view.result, ResultView::Table(_)));

    let response = client.ask("intent seven").await.unwrap();
    assert!(response.intent.is_none());
}
