//! Chart models for historical results

use serde_json::Value;

use crate::payload::TableResult;

/// Slice colors, cycled by row index
pub const PALETTE: [&str; 6] = [
    "#FF9800", // Orange
    "#4CAF50", // Green
    "#2196F3", // Blue
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
];

/// Color for the slice at `index`
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// A chart drawn from the first two declared columns of a table result
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Line(CategorySeries),
    Bar(CategorySeries),
    Pie(PieChart),
}

impl ChartSpec {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ChartSpec::Line(_) => "line",
            ChartSpec::Bar(_) => "bar",
            ChartSpec::Pie(_) => "pie",
        }
    }
}

/// Category axis (first column) against value axis (second column)
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeries {
    pub category_axis: String,
    pub value_axis: String,
    pub points: Vec<CategoryPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPoint {
    pub label: String,
    /// `None` when the cell is missing or not numeric
    pub value: Option<f64>,
}

impl CategorySeries {
    /// Build from the first two columns; `None` when fewer than two exist
    pub fn from_result(result: &TableResult) -> Option<Self> {
        let (category_axis, value_axis) = match result.columns.as_slice() {
            [first, second, ..] => (first.clone(), second.clone()),
            _ => return None,
        };

        let points = result
            .rows
            .iter()
            .map(|row| CategoryPoint {
                label: label_of(row.get(&category_axis)),
                value: numeric_value(row.get(&value_axis)),
            })
            .collect();

        Some(Self {
            category_axis,
            value_axis,
            points,
        })
    }

    /// Points whose value could not be plotted
    pub fn missing_values(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_none()).count()
    }
}

/// Pie chart: one slice per row
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub label_axis: String,
    pub value_axis: String,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: Option<f64>,
    pub color: &'static str,
}

impl PieChart {
    pub fn from_series(series: CategorySeries) -> Self {
        let slices = series
            .points
            .into_iter()
            .enumerate()
            .map(|(idx, point)| PieSlice {
                label: point.label,
                value: point.value,
                color: palette_color(idx),
            })
            .collect();

        Self {
            label_axis: series.category_axis,
            value_axis: series.value_axis,
            slices,
        }
    }

    /// Sum of plottable slice values
    pub fn total(&self) -> f64 {
        self.slices.iter().filter_map(|s| s.value).filter(|v| *v > 0.0).sum()
    }
}

fn label_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Numbers as-is; numeric strings (e.g. serialized decimals) parsed
pub fn numeric_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
