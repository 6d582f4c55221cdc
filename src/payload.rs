//! Wire Types
//!
//! Request and response bodies exchanged with the query/forecast backend.
//! Every response field is optional: the backend may omit any of them or send
//! `null`, and the client never rejects a payload for missing data.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Body of `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Response of `POST /ask`.
///
/// Every field except `result` is read leniently: a value of the wrong JSON
/// type is treated as absent instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub intent: Option<Intent>,
    #[serde(default, deserialize_with = "lenient")]
    pub sql: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub chart: Option<ChartKind>,
    /// Kept raw; its shape depends on `intent` and is interpreted by the view layer.
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub forecast_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

/// Read any JSON value and keep it only if it decodes as `T`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl AskResponse {
    /// Interpret `result` as a tabular historical result
    pub fn table_result(&self) -> Option<TableResult> {
        let result = self.result.as_ref()?.as_object()?;
        let columns = result
            .get("columns")?
            .as_array()?
            .iter()
            .map(|c| match c {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();

        let rows = result
            .get("rows")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|r| r.as_object().cloned().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();

        Some(TableResult { columns, rows })
    }

    /// Interpret `result` as a list of forecast points.
    ///
    /// Returns `None` unless `result` is an array whose every element parses
    /// as a [`ForecastPoint`].
    pub fn forecast_points(&self) -> Option<Vec<ForecastPoint>> {
        let items = self.result.as_ref()?.as_array()?;
        items
            .iter()
            .map(|item| serde_json::from_value(item.clone()).ok())
            .collect()
    }

    /// In-band message carried as `result: {"message": ...}`
    pub fn result_message(&self) -> Option<&str> {
        let result = self.result.as_ref()?.as_object()?;
        if result.contains_key("columns") {
            return None;
        }
        result.get("message")?.as_str()
    }
}

/// Backend classification of a question
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    Historical,
    Forecasting,
    Unknown,
    Other(String),
}

impl Intent {
    pub fn as_str(&self) -> &str {
        match self {
            Intent::Historical => "Historical",
            Intent::Forecasting => "Forecasting",
            Intent::Unknown => "Unknown",
            Intent::Other(s) => s,
        }
    }
}

impl From<&str> for Intent {
    fn from(s: &str) -> Self {
        match s {
            "Historical" => Intent::Historical,
            "Forecasting" => Intent::Forecasting,
            "Unknown" => Intent::Unknown,
            other => Intent::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Intent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Intent::from(s.as_str()))
    }
}

/// Visualization hint for historical results
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Table,
    Other(String),
}

impl ChartKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Table => "table",
            ChartKind::Other(s) => s,
        }
    }
}

impl From<&str> for ChartKind {
    fn from(s: &str) -> Self {
        match s {
            "line" => ChartKind::Line,
            "bar" => ChartKind::Bar,
            "pie" => ChartKind::Pie,
            "table" => ChartKind::Table,
            other => ChartKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChartKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChartKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ChartKind::from(s.as_str()))
    }
}

/// Tabular result of a historical query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableResult {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

/// One forecast record: predicted value with confidence bounds for a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: String,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Response of `POST /train_forecast`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainStatus {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Response of `GET /debug/stats`: row count per table
pub type TableStats = BTreeMap<String, u64>;

/// Response of `GET /debug/sales-data`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSample {
    pub success: bool,
    #[serde(default)]
    pub data_count: u64,
    #[serde(default)]
    pub sample_data: Vec<Map<String, Value>>,
    #[serde(default)]
    pub error: Option<String>,
}
