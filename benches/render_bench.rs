//! Benchmarks for response classification and rendering
//!
//! Run with: cargo bench

use askboard::payload::AskResponse;
use askboard::render::TextRenderer;
use askboard::view::ResponseView;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::{json, Value};

fn table_payload(rows: usize) -> AskResponse {
    let rows: Vec<Value> = (0..rows)
        .map(|i| json!({"month": format!("m{:04}", i), "total_sales": (i as f64) * 17.25}))
        .collect();
    serde_json::from_value(json!({
        "question": "Show total sales by month",
        "intent": "Historical",
        "sql": "SELECT month, total_sales FROM monthly_sales",
        "chart": "bar",
        "result": {"columns": ["month", "total_sales"], "rows": rows}
    }))
    .unwrap()
}

fn forecast_payload(periods: usize) -> AskResponse {
    let points: Vec<Value> = (0..periods)
        .map(|i| {
            let y = 2000.0 + i as f64 * 12.5;
            json!({"ds": format!("d{:04}", i), "yhat": y, "yhat_lower": y - 300.0, "yhat_upper": y + 300.0})
        })
        .collect();
    serde_json::from_value(json!({"intent": "Forecasting", "result": points})).unwrap()
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for size in [10, 100, 1000] {
        let payload = table_payload(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("bar_{}", size), |b| {
            b.iter(|| ResponseView::from_payload(black_box(&payload)))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let renderer = TextRenderer::default().with_color(false);

    for size in [10, 100, 1000] {
        let view = ResponseView::from_payload(&table_payload(size));
        group.bench_function(format!("bar_{}", size), |b| {
            b.iter(|| renderer.render(black_box(&view)))
        });

        let view = ResponseView::from_payload(&forecast_payload(size));
        group.bench_function(format!("forecast_{}", size), |b| {
            b.iter(|| renderer.render(black_box(&view)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_render);
criterion_main!(benches);
