//! Grid rendering for tabular results

use super::style::{pad, truncate, Style};
use crate::payload::ForecastPoint;
use crate::view::{Cell, TableView};

/// Placeholder for a table without rows
pub const NO_DATA: &str = "No data";

/// Widest a single column is allowed to grow
const MAX_COLUMN_WIDTH: usize = 40;

/// Draw the table as an aligned text grid
pub fn draw_table(table: &TableView, style: &Style) -> String {
    if table.is_empty() {
        return format!("{}\n", style.dim(NO_DATA));
    }

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let cell_width = table
                .rows
                .iter()
                .map(|row| cell_width(row.get(i).unwrap_or(&Cell::Null), style))
                .max()
                .unwrap_or(0);
            header.chars().count().max(cell_width).min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut out = String::new();

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(h, w)| style.bold(&pad(&truncate(h, *w), *w)))
        .collect();
    out.push_str(header.join(" | ").trim_end());
    out.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&separator.join("-+-"));
    out.push('\n');

    for row in &table.rows {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| match row.get(i).unwrap_or(&Cell::Null) {
                Cell::Value(v) => pad(&truncate(v, *w), *w),
                Cell::Null => {
                    let padding = w.saturating_sub(style.null_marker_width());
                    format!("{}{}", style.null_marker(), " ".repeat(padding))
                }
            })
            .collect();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
    }

    out.push_str(&style.dim(&format!(
        "({} row{})",
        table.rows.len(),
        if table.rows.len() == 1 { "" } else { "s" }
    )));
    out.push('\n');
    out
}

fn cell_width(cell: &Cell, style: &Style) -> usize {
    match cell {
        Cell::Value(v) => v.chars().count(),
        Cell::Null => style.null_marker_width(),
    }
}

/// Write the table as CSV; null cells become empty fields
pub fn table_to_csv(table: &TableView) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| match cell {
            Cell::Value(v) => v.as_str(),
            Cell::Null => "",
        }))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write forecast points as CSV with a `ds,yhat,yhat_lower,yhat_upper` header
pub fn forecast_to_csv(points: &[ForecastPoint]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for point in points {
        writer.serialize(point)?;
    }
    if points.is_empty() {
        writer.write_record(["ds", "yhat", "yhat_lower", "yhat_upper"])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
