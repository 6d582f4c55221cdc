//! Terminal Rendering
//!
//! Draws [`ResponseView`]s and session chrome (error banner, example chips,
//! training status) as plain or ANSI-styled text.
//!
//! Rendering is a pure function of its input: nothing here performs I/O.

mod chart;
mod style;
mod table;

pub use chart::{draw_bar, draw_forecast, draw_line, draw_pie};
pub use style::{Style, NULL_MARKER};
pub use table::{draw_table, forecast_to_csv, table_to_csv, NO_DATA};

use crate::config::UiConfig;
use crate::payload::TrainStatus;
use crate::view::{ChartSpec, ForecastChart, IntentBadge, ResponseView, ResultView};

/// Renders views as terminal text
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub style: Style,
    pub width: usize,
    pub height: usize,
    /// Expand the SQL block instead of showing the collapsed toggle
    pub show_sql: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}

impl TextRenderer {
    pub fn from_config(config: &UiConfig) -> Self {
        Self {
            style: Style::new(config.color),
            width: config.chart_width,
            height: config.chart_height,
            show_sql: config.show_sql,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.style = Style::new(color);
        self
    }

    pub fn with_sql(mut self, show_sql: bool) -> Self {
        self.show_sql = show_sql;
        self
    }

    /// Draw a full response: badge, question, backend message, SQL, result and summary
    pub fn render(&self, view: &ResponseView) -> String {
        let mut out = String::new();

        let badge = self.badge(view.badge, view.intent.as_ref().map(|i| i.as_str()));
        match &view.question {
            Some(q) => out.push_str(&format!("{} {}\n", badge, self.style.bold(q))),
            None => out.push_str(&format!("{}\n", badge)),
        }

        // The backend explains declined questions here
        if let Some(message) = &view.message {
            out.push_str(&format!("{}\n", self.style.dim(message)));
        }

        if let Some(sql) = &view.sql {
            if self.show_sql {
                out.push_str(&format!("{}\n", self.style.dim("▾ SQL")));
                for line in sql.lines() {
                    out.push_str(&format!("    {}\n", line));
                }
            } else {
                out.push_str(&format!("{}\n", self.style.dim("▸ SQL (hidden)")));
            }
        }

        out.push('\n');
        out.push_str(&self.render_result(&view.result));

        if !view.summary.is_empty() {
            out.push('\n');
            for paragraph in &view.summary {
                out.push_str(paragraph);
                out.push('\n');
            }
        }

        out
    }

    /// Draw only the result area
    pub fn render_result(&self, result: &ResultView) -> String {
        match result {
            ResultView::Chart(ChartSpec::Line(series)) => {
                draw_line(series, self.width, self.height, &self.style)
            }
            ResultView::Chart(ChartSpec::Bar(series)) => draw_bar(series, self.width, &self.style),
            ResultView::Chart(ChartSpec::Pie(pie)) => draw_pie(pie, self.width, &self.style),
            ResultView::Table(table) => draw_table(table, &self.style),
            ResultView::Forecast(chart) => self.render_forecast(chart),
            ResultView::Notice(message) => format!("{}\n", message),
            ResultView::Empty => String::new(),
            ResultView::UnknownShape { intent, chart } => format!(
                "{}\n",
                self.style.dim(&format!(
                    "Nothing to display for intent={} chart={}",
                    intent.as_ref().map_or("none", |i| i.as_str()),
                    chart.as_ref().map_or("none", |c| c.as_str()),
                ))
            ),
        }
    }

    /// Draw a forecast chart followed by its digest
    pub fn render_forecast(&self, chart: &ForecastChart) -> String {
        let mut out = draw_forecast(chart, self.width, self.height, &self.style);
        if let Some(digest) = chart.digest() {
            out.push('\n');
            for line in digest.lines() {
                out.push_str(&format!("• {}\n", line));
            }
        }
        out
    }

    /// Intent badge, e.g. `[Historical]`
    pub fn badge(&self, badge: IntentBadge, label: Option<&str>) -> String {
        let text = format!("[{}]", label.unwrap_or("—"));
        let color = match badge {
            IntentBadge::Historical => Some(crate::view::PALETTE[2]),
            IntentBadge::Forecasting => Some(crate::view::PALETTE[3]),
            IntentBadge::Unknown => Some(crate::view::PALETTE[0]),
            IntentBadge::Default => None,
        };
        match color {
            Some(c) => self.style.hex(c, &text),
            None => self.style.dim(&text),
        }
    }

    /// Error banner line
    pub fn error_banner(&self, message: &str) -> String {
        format!("{}\n", self.style.red(&format!("✖ {}", message)))
    }

    /// Numbered example chips, e.g. `[1] Show total sales by month`
    pub fn example_chips(&self, examples: &[String]) -> String {
        examples
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{} {}", self.style.bold(&format!("[{}]", i + 1)), e))
            .collect::<Vec<_>>()
            .join("   ")
            + "\n"
    }

    /// Outcome of a training request
    pub fn train_status(&self, status: &TrainStatus) -> String {
        let mut out = String::new();
        if let Some(message) = &status.message {
            out.push_str(&format!("{}\n", message));
        }
        if let Some(rows) = status.rows {
            out.push_str(&format!("Rows: {}\n", rows));
        }
        if let Some(range) = &status.date_range {
            out.push_str(&format!("Date range: {} → {}\n", range.start, range.end));
        }
        if out.is_empty() {
            out.push_str("Training finished\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::AskResponse;
    use serde_json::json;

    fn renderer() -> TextRenderer {
        TextRenderer::default().with_color(false)
    }

    fn view(value: serde_json::Value) -> ResponseView {
        let payload: AskResponse = serde_json::from_value(value).unwrap();
        ResponseView::from_payload(&payload)
    }

    #[test]
    fn test_sql_collapsed_and_expanded() {
        let v = view(json!({
            "question": "Show total sales by month",
            "intent": "Historical",
            "sql": "SELECT month, total\nFROM monthly_sales",
            "chart": "bar",
            "result": {"columns": ["month", "total"], "rows": [{"month": "1997-01", "total": 1}]}
        }));

        let collapsed = renderer().render(&v);
        assert!(collapsed.starts_with("[Historical] Show total sales by month\n"));
        assert!(collapsed.contains("▸ SQL (hidden)"));
        assert!(!collapsed.contains("FROM monthly_sales"));
        assert!(collapsed.contains("total by month"));

        let expanded = renderer().with_sql(true).render(&v);
        assert!(expanded.contains("    SELECT month, total\n    FROM monthly_sales\n"));
    }

    #[test]
    fn test_summary_paragraphs_in_order() {
        let v = view(json!({
            "intent": "Forecasting",
            "result": [{"ds": "1998-05-07", "yhat": 1.0, "yhat_lower": 0.5, "yhat_upper": 1.5}],
            "forecast_summary": "Line A\nLine B"
        }));
        let out = renderer().render(&v);

        let a = out.find("Line A\n").unwrap();
        let b = out.find("Line B\n").unwrap();
        assert!(a < b);
        assert!(out.contains("• Trend: stable"));
    }

    #[test]
    fn test_table_fallback_and_placeholder() {
        let v = view(json!({
            "intent": "Historical",
            "result": {"columns": ["month", "total"], "rows": []}
        }));
        assert!(renderer().render(&v).ends_with("No data\n"));
    }

    #[test]
    fn test_unknown_shape_is_reported() {
        let v = view(json!({"intent": "Unknown", "chart": "pie", "result": {"rows": 3}}));
        assert!(renderer()
            .render(&v)
            .contains("Nothing to display for intent=Unknown chart=pie"));
    }

    #[test]
    fn test_chips_and_banner() {
        let r = renderer();
        let chips = r.example_chips(&["A".to_string(), "B".to_string()]);
        assert_eq!(chips, "[1] A   [2] B\n");
        assert_eq!(r.error_banner("HTTP error! status: 500"), "✖ HTTP error! status: 500\n");
    }

    #[test]
    fn test_train_status() {
        let status: TrainStatus = serde_json::from_value(json!({
            "success": true,
            "message": "Forecast model trained successfully",
            "rows": 480,
            "date_range": {"start": "1996-07-04", "end": "1998-05-06"}
        }))
        .unwrap();

        let out = renderer().train_status(&status);
        assert!(out.contains("Rows: 480"));
        assert!(out.contains("1996-07-04 → 1998-05-06"));
    }

    #[test]
    fn test_backend_message_under_badge() {
        let v = view(json!({
            "question": "What is the weather?",
            "intent": "Unknown",
            "sql": null,
            "result": null,
            "message": "I can only answer questions about the sales database."
        }));
        let out = renderer().render(&v);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "[Unknown] What is the weather?");
        assert_eq!(lines[1], "I can only answer questions about the sales database.");
    }
}
