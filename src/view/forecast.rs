//! Forecast chart model and digest

use std::fmt;

use crate::payload::ForecastPoint;

pub const PREDICTED_COLOR: &str = "#2196F3";
pub const LOWER_BOUND_COLOR: &str = "#4CAF50";
pub const UPPER_BOUND_COLOR: &str = "#F44336";

/// One line of the forecast chart
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub name: &'static str,
    pub color: &'static str,
    pub values: Vec<f64>,
}

/// Predicted value, lower bound and upper bound against the date axis
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastChart {
    pub dates: Vec<String>,
    pub predicted: ForecastSeries,
    pub lower: ForecastSeries,
    pub upper: ForecastSeries,
}

impl ForecastChart {
    pub fn from_points(points: &[ForecastPoint]) -> Self {
        Self {
            dates: points.iter().map(|p| p.ds.clone()).collect(),
            predicted: ForecastSeries {
                name: "yhat",
                color: PREDICTED_COLOR,
                values: points.iter().map(|p| p.yhat).collect(),
            },
            lower: ForecastSeries {
                name: "yhat_lower",
                color: LOWER_BOUND_COLOR,
                values: points.iter().map(|p| p.yhat_lower).collect(),
            },
            upper: ForecastSeries {
                name: "yhat_upper",
                color: UPPER_BOUND_COLOR,
                values: points.iter().map(|p| p.yhat_upper).collect(),
            },
        }
    }

    /// The three overlaid lines, in drawing order
    pub fn series(&self) -> [&ForecastSeries; 3] {
        [&self.predicted, &self.lower, &self.upper]
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn digest(&self) -> Option<ForecastDigest> {
        ForecastDigest::compute(&self.dates, &self.predicted.values)
    }
}

/// Direction of the predicted series from first to last point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Summary statistics of a forecast's predicted values
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDigest {
    pub days: usize,
    pub average: f64,
    pub max: f64,
    pub max_date: String,
    pub min: f64,
    pub min_date: String,
    pub trend: Trend,
    /// Absolute change from first to last value, in percent of the first
    pub trend_percent: f64,
}

impl ForecastDigest {
    pub fn compute(dates: &[String], values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let last = *values.last()?;

        let average = values.iter().sum::<f64>() / values.len() as f64;

        // First occurrence wins on ties
        let mut max_idx = 0;
        let mut min_idx = 0;
        for (i, v) in values.iter().enumerate() {
            if *v > values[max_idx] {
                max_idx = i;
            }
            if *v < values[min_idx] {
                min_idx = i;
            }
        }

        let trend = if last > first {
            Trend::Increasing
        } else if last < first {
            Trend::Decreasing
        } else {
            Trend::Stable
        };

        let trend_percent = if first != 0.0 {
            ((last - first) / first * 100.0).abs()
        } else {
            0.0
        };

        let date_at = |i: usize| dates.get(i).cloned().unwrap_or_default();

        Some(Self {
            days: values.len(),
            average,
            max: values[max_idx],
            max_date: date_at(max_idx),
            min: values[min_idx],
            min_date: date_at(min_idx),
            trend,
            trend_percent,
        })
    }

    /// Bullet lines describing the digest
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!(
                "Average daily value over the next {} days: {}",
                self.days,
                format_amount(self.average)
            ),
            format!(
                "Trend: {} ({:.1}% change from start to end)",
                self.trend, self.trend_percent
            ),
            format!("Highest: {} on {}", format_amount(self.max), self.max_date),
            format!("Lowest: {} on {}", format_amount(self.min), self.min_date),
        ]
    }
}

/// Two decimals with thousands separators, e.g. `12,345.60`
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
