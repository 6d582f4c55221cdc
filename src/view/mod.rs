//! Response View Model
//!
//! Turns a backend payload into a tagged description of what to show.
//!
//! The payload's shape is selected by loosely related fields (`intent`,
//! `chart`, and the shape of `result`). [`ResultView::classify`] matches on all
//! of them at once, so every combination lands in exactly one variant and a
//! combination nothing knows how to draw is reported as
//! [`ResultView::UnknownShape`] rather than rendered as blank space.
//!
//! | intent      | chart            | result                 | view          |
//! |-------------|------------------|------------------------|---------------|
//! | any         | any              | absent / null          | `Empty`       |
//! | any         | any              | `{"message": ...}`     | `Notice`      |
//! | Historical  | line / bar / pie | `{columns, rows}` (≥2) | `Chart`       |
//! | Historical  | anything else    | `{columns, rows}`      | `Table`       |
//! | Forecasting | any              | `[{ds, yhat, ...}]`    | `Forecast`    |
//! | otherwise   |                  |                        | `UnknownShape`|

mod chart;
mod forecast;
mod table;

pub use chart::{
    numeric_value, palette_color, CategoryPoint, CategorySeries, ChartSpec, PieChart, PieSlice,
    PALETTE,
};
pub use forecast::{
    format_amount, ForecastChart, ForecastDigest, ForecastSeries, Trend, LOWER_BOUND_COLOR,
    PREDICTED_COLOR, UPPER_BOUND_COLOR,
};
pub use table::{Cell, TableView};

use crate::payload::{AskResponse, ChartKind, Intent};

/// Display class of the intent badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentBadge {
    Historical,
    Forecasting,
    Unknown,
    Default,
}

impl IntentBadge {
    pub fn for_intent(intent: Option<&Intent>) -> Self {
        match intent {
            Some(Intent::Historical) => IntentBadge::Historical,
            Some(Intent::Forecasting) => IntentBadge::Forecasting,
            Some(Intent::Unknown) => IntentBadge::Unknown,
            Some(Intent::Other(_)) | None => IntentBadge::Default,
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            IntentBadge::Historical => "historical",
            IntentBadge::Forecasting => "forecasting",
            IntentBadge::Unknown => "unknown",
            IntentBadge::Default => "default",
        }
    }
}

/// What the result area shows
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Chart(ChartSpec),
    Table(TableView),
    Forecast(ForecastChart),
    /// The backend reported a problem inside `result`
    Notice(String),
    Empty,
    UnknownShape {
        intent: Option<Intent>,
        chart: Option<ChartKind>,
    },
}

impl ResultView {
    pub fn classify(payload: &AskResponse) -> Self {
        if payload.result.as_ref().map_or(true, |r| r.is_null()) {
            return ResultView::Empty;
        }
        if let Some(message) = payload.result_message() {
            return ResultView::Notice(message.to_string());
        }

        match (payload.intent.as_ref(), payload.chart.as_ref()) {
            (Some(Intent::Historical), chart) => match payload.table_result() {
                Some(table) => {
                    let series = match chart {
                        Some(ChartKind::Line | ChartKind::Bar | ChartKind::Pie) => {
                            CategorySeries::from_result(&table)
                        }
                        _ => None,
                    };
                    match (chart, series) {
                        (Some(ChartKind::Line), Some(s)) => ResultView::Chart(ChartSpec::Line(s)),
                        (Some(ChartKind::Bar), Some(s)) => ResultView::Chart(ChartSpec::Bar(s)),
                        (Some(ChartKind::Pie), Some(s)) => {
                            ResultView::Chart(ChartSpec::Pie(PieChart::from_series(s)))
                        }
                        _ => ResultView::Table(TableView::from_result(&table)),
                    }
                }
                None => Self::unknown(payload),
            },
            (Some(Intent::Forecasting), _) => match payload.forecast_points() {
                Some(points) => ResultView::Forecast(ForecastChart::from_points(&points)),
                None => Self::unknown(payload),
            },
            (Some(Intent::Unknown | Intent::Other(_)) | None, _) => Self::unknown(payload),
        }
    }

    fn unknown(payload: &AskResponse) -> Self {
        ResultView::UnknownShape {
            intent: payload.intent.clone(),
            chart: payload.chart.clone(),
        }
    }
}

/// Everything needed to draw one response
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseView {
    pub question: Option<String>,
    pub intent: Option<Intent>,
    pub badge: IntentBadge,
    /// Generated SQL, offered collapsed
    pub sql: Option<String>,
    pub result: ResultView,
    /// `forecast_summary` split into paragraphs, in order
    pub summary: Vec<String>,
    pub message: Option<String>,
}

impl ResponseView {
    pub fn from_payload(payload: &AskResponse) -> Self {
        Self {
            question: payload.question.clone(),
            intent: payload.intent.clone(),
            badge: IntentBadge::for_intent(payload.intent.as_ref()),
            sql: payload.sql.clone().filter(|s| !s.trim().is_empty()),
            result: ResultView::classify(payload),
            summary: payload
                .forecast_summary
                .as_deref()
                .map(summary_paragraphs)
                .unwrap_or_default(),
            message: payload.message.clone().filter(|m| !m.trim().is_empty()),
        }
    }
}

/// One paragraph per line of the summary text
pub fn summary_paragraphs(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> AskResponse {
        serde_json::from_value(value).unwrap()
    }

    fn historical(chart: Option<&str>) -> AskResponse {
        payload(json!({
            "question": "Show total sales by month",
            "intent": "Historical",
            "sql": "SELECT month, total FROM monthly_sales",
            "chart": chart,
            "result": {
                "columns": ["month", "total"],
                "rows": [
                    {"month": "1997-01", "total": 61258.07},
                    {"month": "1997-02", "total": null}
                ]
            }
        }))
    }

    #[test]
    fn test_bar_chart_axes() {
        let view = ResponseView::from_payload(&historical(Some("bar")));

        match &view.result {
            ResultView::Chart(ChartSpec::Bar(series)) => {
                assert_eq!(series.category_axis, "month");
                assert_eq!(series.value_axis, "total");
                assert_eq!(series.points[0].label, "1997-01");
            }
            other => panic!("expected bar chart, got {:?}", other),
        }
        assert_eq!(view.sql.as_deref(), Some("SELECT month, total FROM monthly_sales"));
        assert_eq!(view.badge, IntentBadge::Historical);
    }

    #[test]
    fn test_line_and_pie() {
        assert!(matches!(
            ResultView::classify(&historical(Some("line"))),
            ResultView::Chart(ChartSpec::Line(_))
        ));

        match ResultView::classify(&historical(Some("pie"))) {
            ResultView::Chart(ChartSpec::Pie(pie)) => {
                assert_eq!(pie.slices[0].color, PALETTE[0]);
                assert_eq!(pie.slices[1].color, PALETTE[1]);
            }
            other => panic!("expected pie chart, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_chart_falls_back_to_table() {
        for chart in [None, Some("table"), Some("scatter")] {
            match ResultView::classify(&historical(chart)) {
                ResultView::Table(table) => {
                    assert_eq!(table.columns, vec!["month", "total"]);
                    assert_eq!(table.rows[0][0], Cell::Value("1997-01".into()));
                    assert_eq!(table.rows[1][1], Cell::Null);
                }
                other => panic!("expected table for {:?}, got {:?}", chart, other),
            }
        }
    }

    #[test]
    fn test_chart_with_single_column_falls_back_to_table() {
        let p = payload(json!({
            "intent": "Historical",
            "chart": "bar",
            "result": {"columns": ["total"], "rows": [{"total": 5}]}
        }));
        assert!(matches!(ResultView::classify(&p), ResultView::Table(_)));
    }

    #[test]
    fn test_forecast() {
        let p = payload(json!({
            "intent": "Forecasting",
            "chart": "line",
            "result": [
                {"ds": "1998-05-07", "yhat": 3000.0, "yhat_lower": 1500.0, "yhat_upper": 4400.0}
            ],
            "forecast_summary": "Line A\nLine B"
        }));
        let view = ResponseView::from_payload(&p);

        match &view.result {
            ResultView::Forecast(chart) => assert_eq!(chart.series().len(), 3),
            other => panic!("expected forecast, got {:?}", other),
        }
        assert_eq!(view.summary, vec!["Line A", "Line B"]);
        assert_eq!(view.badge, IntentBadge::Forecasting);
        assert!(view.sql.is_none());
    }

    #[test]
    fn test_notice_from_result_message() {
        let p = payload(json!({
            "intent": "Forecasting",
            "result": {"message": "No trained forecast model found. Please train the model first using /train_forecast endpoint."}
        }));
        match ResultView::classify(&p) {
            ResultView::Notice(msg) => assert!(msg.starts_with("No trained forecast model")),
            other => panic!("expected notice, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_intent() {
        let p = payload(json!({
            "intent": "Unknown",
            "sql": null,
            "message": "I can only answer questions about the sales database.",
            "result": null
        }));
        let view = ResponseView::from_payload(&p);

        assert_eq!(view.result, ResultView::Empty);
        assert_eq!(view.badge, IntentBadge::Unknown);
        assert!(view.message.is_some());
    }

    #[test]
    fn test_unknown_shape() {
        let p = payload(json!({"intent": "Forecasting", "chart": "line", "result": {"rows": []}}));
        assert_eq!(
            ResultView::classify(&p),
            ResultView::UnknownShape {
                intent: Some(Intent::Forecasting),
                chart: Some(ChartKind::Line),
            }
        );

        let p = payload(json!({"chart": "bar", "result": {"columns": ["a", "b"], "rows": []}}));
        assert!(matches!(ResultView::classify(&p), ResultView::UnknownShape { intent: None, .. }));
    }

    #[test]
    fn test_badge_classes() {
        assert_eq!(IntentBadge::for_intent(None).class_name(), "default");
        assert_eq!(
            IntentBadge::for_intent(Some(&Intent::Other("Mixed".into()))),
            IntentBadge::Default
        );
    }

    #[test]
    fn test_summary_keeps_order_and_blank_lines() {
        assert_eq!(summary_paragraphs("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(summary_paragraphs("single"), vec!["single"]);
    }

    #[test]
    fn test_mistyped_chart_falls_back_to_table() {
        let p = payload(json!({
            "intent": "Historical",
            "chart": ["bar"],
            "message": {"detail": "x"},
            "result": {"columns": ["month", "total"], "rows": [{"month": "1997-01", "total": 3}]}
        }));
        let view = ResponseView::from_payload(&p);

        assert!(matches!(view.result, ResultView::Table(_)));
        assert!(view.message.is_none());
    }

    #[test]
    fn test_mistyped_intent_is_unknown_shape() {
        let p = payload(json!({
            "intent": 7,
            "chart": "bar",
            "result": {"columns": ["month", "total"], "rows": []}
        }));
        let view = ResponseView::from_payload(&p);

        assert_eq!(view.badge, IntentBadge::Default);
        assert!(matches!(view.result, ResultView::UnknownShape { intent: None, .. }));
    }
}
