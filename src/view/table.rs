//! Tabular view of a historical result

use serde_json::Value;

use crate::payload::TableResult;

/// A rendered grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Value(String),
    /// JSON `null` or a column missing from the row
    Null,
}

impl Cell {
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Cell::Null,
            Some(Value::String(s)) => Cell::Value(s.clone()),
            Some(other) => Cell::Value(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

/// Column headers plus rows of cells, in declared column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableView {
    pub fn from_result(result: &TableResult) -> Self {
        let rows = result
            .rows
            .iter()
            .map(|row| {
                result
                    .columns
                    .iter()
                    .map(|col| Cell::from_json(row.get(col)))
                    .collect()
            })
            .collect();

        Self {
            columns: result.columns.clone(),
            rows,
        }
    }

    /// No rows to show; rendered as a "No data" placeholder
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
