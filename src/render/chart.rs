//! Terminal chart drawing
//!
//! Line and forecast charts share one scatter-plot grid; bars and pie slices
//! are drawn as horizontal bars scaled to the largest value.

use super::style::{pad, truncate, Style};
use crate::view::{format_amount, CategorySeries, ForecastChart, PieChart};

const BAR_GLYPH: char = '█';
const LABEL_WIDTH: usize = 16;
const Y_LABEL_WIDTH: usize = 12;

/// One series on a plot grid
struct PlotSeries<'a> {
    values: Vec<f64>,
    glyph: char,
    color: &'a str,
}

/// Plot series against a shared x axis of `len` points.
///
/// Later series overwrite earlier ones where they share a cell.
fn plot(
    series: &[PlotSeries<'_>],
    len: usize,
    width: usize,
    height: usize,
    style: &Style,
) -> Vec<String> {
    let height = height.max(2);
    let cols = len.min(width.max(1));

    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for s in series {
        for v in &s.values {
            min = min.min(*v);
            max = max.max(*v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        min -= 1.0;
        max += 1.0;
    }

    let mut grid: Vec<Vec<Option<(char, &str)>>> = vec![vec![None; cols]; height];
    for s in series {
        for (i, v) in s.values.iter().enumerate() {
            let x = if len <= 1 { 0 } else { i * (cols - 1) / (len - 1) };
            let y = ((max - v) / (max - min) * (height - 1) as f64).round() as usize;
            grid[y.min(height - 1)][x] = Some((s.glyph, s.color));
        }
    }

    grid.into_iter()
        .enumerate()
        .map(|(row, cells)| {
            let label = if row == 0 {
                format_amount(max)
            } else if row == height - 1 {
                format_amount(min)
            } else if row == (height - 1) / 2 {
                format_amount(max - (max - min) * row as f64 / (height - 1) as f64)
            } else {
                String::new()
            };
            let line: String = cells
                .into_iter()
                .map(|cell| match cell {
                    Some((glyph, color)) => style.hex(color, &glyph.to_string()),
                    None => " ".to_string(),
                })
                .collect();
            format!("{:>w$} ┤{}", label, line.trim_end(), w = Y_LABEL_WIDTH)
        })
        .collect()
}

fn x_axis(first: &str, last: &str, cols: usize) -> Vec<String> {
    let indent = " ".repeat(Y_LABEL_WIDTH + 1);
    let mut lines = vec![format!("{}└{}", indent, "─".repeat(cols))];
    let gap = (cols + 1).saturating_sub(first.chars().count() + last.chars().count()).max(1);
    if first == last {
        lines.push(format!("{} {}", indent, first));
    } else {
        lines.push(format!("{} {}{}{}", indent, first, " ".repeat(gap), last));
    }
    lines
}

fn missing_note(missing: usize, style: &Style) -> Option<String> {
    (missing > 0).then(|| {
        style.dim(&format!(
            "({} value{} not numeric, plotted as 0)",
            missing,
            if missing == 1 { "" } else { "s" }
        ))
    })
}

/// Line chart: categories along x, values along y
pub fn draw_line(series: &CategorySeries, width: usize, height: usize, style: &Style) -> String {
    if series.points.is_empty() {
        return format!("{}\n", style.dim("No data"));
    }

    let values: Vec<f64> = series.points.iter().map(|p| p.value.unwrap_or(0.0)).collect();
    let len = values.len();
    let cols = len.min(width.max(1));

    let mut lines = vec![style.bold(&format!("{} by {}", series.value_axis, series.category_axis))];
    lines.extend(plot(
        &[PlotSeries {
            values,
            glyph: '●',
            color: crate::view::PALETTE[2],
        }],
        len,
        width,
        height,
        style,
    ));

    let first = &series.points[0].label;
    let last = &series.points[len - 1].label;
    lines.extend(x_axis(first, last, cols));
    lines.extend(missing_note(series.missing_values(), style));

    lines.join("\n") + "\n"
}

/// Bar chart: one horizontal bar per category
pub fn draw_bar(series: &CategorySeries, width: usize, style: &Style) -> String {
    if series.points.is_empty() {
        return format!("{}\n", style.dim("No data"));
    }

    let max = series
        .points
        .iter()
        .filter_map(|p| p.value)
        .fold(0.0_f64, f64::max);

    let mut lines = vec![style.bold(&format!("{} by {}", series.value_axis, series.category_axis))];
    for point in &series.points {
        let value = point.value.unwrap_or(0.0);
        let len = bar_len(value, max, width);
        lines.push(format!(
            "{} │{} {}",
            pad(&truncate(&point.label, LABEL_WIDTH), LABEL_WIDTH),
            style.hex(crate::view::PALETTE[0], &BAR_GLYPH.to_string().repeat(len)),
            format_amount(value)
        ));
    }
    lines.extend(missing_note(series.missing_values(), style));

    lines.join("\n") + "\n"
}

/// Pie chart: one swatch, share and proportional bar per slice
pub fn draw_pie(pie: &PieChart, width: usize, style: &Style) -> String {
    if pie.slices.is_empty() {
        return format!("{}\n", style.dim("No data"));
    }

    let total = pie.total();
    let mut lines = vec![style.bold(&format!("{} by {}", pie.value_axis, pie.label_axis))];

    for slice in &pie.slices {
        let value = slice.value.unwrap_or(0.0).max(0.0);
        let share = if total > 0.0 { value / total } else { 0.0 };
        let swatch = if style.color {
            style.hex(slice.color, "■")
        } else {
            slice.color.to_string()
        };
        lines.push(format!(
            "{} {} {:>6.1}% {} {}",
            swatch,
            pad(&truncate(&slice.label, LABEL_WIDTH), LABEL_WIDTH),
            share * 100.0,
            style.hex(slice.color, &BAR_GLYPH.to_string().repeat(bar_len(value, total, width / 2))),
            format_amount(value)
        ));
    }
    let missing = pie.slices.iter().filter(|s| s.value.is_none()).count();
    lines.extend(missing_note(missing, style));

    lines.join("\n") + "\n"
}

/// Forecast chart: predicted value and both bounds overlaid
pub fn draw_forecast(chart: &ForecastChart, width: usize, height: usize, style: &Style) -> String {
    if chart.is_empty() {
        return format!("{}\n", style.dim("No forecast data"));
    }

    let len = chart.dates.len();
    let cols = len.min(width.max(1));
    let glyphs = ['●', '-', '+'];

    // Bounds first so the prediction stays visible where lines meet
    let plotted: Vec<PlotSeries<'_>> = [
        (&chart.lower, glyphs[1]),
        (&chart.upper, glyphs[2]),
        (&chart.predicted, glyphs[0]),
    ]
    .into_iter()
    .map(|(s, glyph)| PlotSeries {
        values: s.values.clone(),
        glyph,
        color: s.color,
    })
    .collect();

    let mut lines = vec![style.bold("Forecast")];
    lines.extend(plot(&plotted, len, width, height, style));
    lines.extend(x_axis(&chart.dates[0], &chart.dates[len - 1], cols));

    let legend: Vec<String> = chart
        .series()
        .iter()
        .zip(glyphs)
        .map(|(s, glyph)| format!("{} {}", style.hex(s.color, &glyph.to_string()), s.name))
        .collect();
    lines.push(format!("{}  {}", " ".repeat(Y_LABEL_WIDTH), legend.join("   ")));

    lines.join("\n") + "\n"
}

fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max) * width as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ForecastPoint;
    use crate::view::{CategoryPoint, PieChart};

    fn series() -> CategorySeries {
        CategorySeries {
            category_axis: "month".into(),
            value_axis: "total".into(),
            points: vec![
                CategoryPoint {
                    label: "1997-01".into(),
                    value: Some(100.0),
                },
                CategoryPoint {
                    label: "1997-02".into(),
                    value: Some(50.0),
                },
                CategoryPoint {
                    label: "1997-03".into(),
                    value: None,
                },
            ],
        }
    }

    #[test]
    fn test_bar_lengths() {
        let out = draw_bar(&series(), 20, &Style::plain());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "total by month");
        assert_eq!(lines[1].matches(BAR_GLYPH).count(), 20);
        assert_eq!(lines[2].matches(BAR_GLYPH).count(), 10);
        assert_eq!(lines[3].matches(BAR_GLYPH).count(), 0);
        assert!(lines[1].starts_with("1997-01"));
        assert!(lines[1].ends_with("100.00"));
        assert_eq!(lines[4], "(1 value not numeric, plotted as 0)");
    }

    #[test]
    fn test_line_plot() {
        let out = draw_line(&series(), 30, 5, &Style::plain());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "total by month");
        // title + 5 plot rows + axis + labels + note
        assert_eq!(lines.len(), 9);
        assert_eq!(out.matches('●').count(), 3);
        // the maximum sits on the top row, the zero on the bottom row
        assert!(lines[1].contains('●'));
        assert!(lines[5].contains('●'));
        assert!(lines[7].contains("1997-01") && lines[7].contains("1997-03"));
    }

    #[test]
    fn test_pie_shares() {
        let pie = PieChart::from_series(CategorySeries {
            category_axis: "region".into(),
            value_axis: "sales".into(),
            points: vec![
                CategoryPoint {
                    label: "North".into(),
                    value: Some(75.0),
                },
                CategoryPoint {
                    label: "South".into(),
                    value: Some(25.0),
                },
            ],
        });
        let out = draw_pie(&pie, 40, &Style::plain());
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[1].starts_with("#FF9800 North"));
        assert!(lines[1].contains("75.0%"));
        assert!(lines[2].starts_with("#4CAF50 South"));
        assert!(lines[2].contains("25.0%"));
    }

    #[test]
    fn test_forecast_plot_has_three_series() {
        let points: Vec<ForecastPoint> = (0..10)
            .map(|i| ForecastPoint {
                ds: format!("1998-05-{:02}", i + 7),
                yhat: 100.0 + i as f64,
                yhat_lower: 50.0 + i as f64,
                yhat_upper: 150.0 + i as f64,
            })
            .collect();
        let chart = ForecastChart::from_points(&points);
        let out = draw_forecast(&chart, 40, 10, &Style::plain());

        // Dates below the axis contain '-' too
        let plot_rows: Vec<&str> = out.lines().take_while(|l| !l.contains('└')).collect();
        assert_eq!(plot_rows.len(), 11);
        for glyph in ['●', '-', '+'] {
            assert!(plot_rows.iter().any(|l| l.contains(glyph)), "missing {}", glyph);
        }
        assert!(out.contains("yhat_lower"));
        assert!(out.contains("yhat_upper"));
        assert!(out.contains("1998-05-07") && out.contains("1998-05-16"));
    }

    #[test]
    fn test_empty_forecast() {
        let chart = ForecastChart::from_points(&[]);
        assert_eq!(draw_forecast(&chart, 40, 10, &Style::plain()), "No forecast data\n");
    }
}
