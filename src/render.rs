//! Terminal rendering of tables and bar charts.

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table as Grid, presets::UTF8_FULL};

use crate::processor::{AnalyzerError, Value};
use crate::table::Table;

const BAR: char = '█';

pub fn format_cell(cell: &Option<Value>, decimals: usize) -> String {
    match cell {
        None => String::new(),
        Some(Value::Float(v)) => format!("{v:.decimals$}"),
        Some(v) => v.to_string(),
    }
}

/// Draws `table` as a grid with centred cells.
pub fn table(table: &Table, decimals: usize) -> String {
    let mut grid = Grid::new();
    grid.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            table
                .columns
                .iter()
                .map(|c| Cell::new(c).set_alignment(CellAlignment::Center))
                .collect::<Vec<_>>(),
        );

    for row in &table.rows {
        grid.add_row(
            row.iter()
                .map(|cell| {
                    Cell::new(format_cell(cell, decimals)).set_alignment(CellAlignment::Center)
                })
                .collect::<Vec<_>>(),
        );
    }

    grid.to_string()
}

/// Horizontal bar chart of `value_column` labelled by `label_column`
///
/// The longest bar is `width` characters; each bar ends with its value.
/// Missing and negative values draw an empty bar.
///
/// # Errors
/// [`AnalyzerError::ColumnNotFound`] for an unknown column,
/// [`AnalyzerError::NonNumericColumn`] if `value_column` holds text.
pub fn bar_chart(
    table: &Table,
    label_column: &str,
    value_column: &str,
    width: usize,
    decimals: usize,
) -> Result<String, AnalyzerError> {
    let label_idx = table
        .column_index(label_column)
        .ok_or_else(|| AnalyzerError::ColumnNotFound(label_column.to_string()))?;
    let value_idx = table
        .column_index(value_column)
        .ok_or_else(|| AnalyzerError::ColumnNotFound(value_column.to_string()))?;

    let mut bars = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let label = format_cell(&row.get(label_idx).cloned().flatten(), decimals);
        let cell = row.get(value_idx).cloned().flatten();
        let value = match &cell {
            None => 0.0,
            Some(v) => v
                .as_f64()
                .ok_or_else(|| AnalyzerError::NonNumericColumn(value_column.to_string()))?,
        };
        bars.push((label, value, format_cell(&cell, decimals)));
    }

    let label_width = bars.iter().map(|(l, _, _)| l.chars().count()).max().unwrap_or(0);
    let max = bars.iter().map(|(_, v, _)| *v).fold(0.0f64, f64::max);

    let mut out = String::new();
    for (label, value, shown) in bars {
        let len = if max > 0.0 && value > 0.0 {
            ((value / max) * width as f64).round() as usize
        } else {
            0
        };
        let pad = label_width - label.chars().count();
        out.push_str(&format!(
            "{label}{} │{} {shown}\n",
            " ".repeat(pad),
            BAR.to_string().repeat(len)
        ));
    }

    Ok(out)
}
