//! Plain tabular data handed to renderers and writers.

use crate::processor::Value;
use crate::processor::frequency::FrequencyRow;
use crate::processor::stats::GroupStatsRow;
use crate::processor::trend::TrendMatrix;
use crate::profile::Labels;

/// A named table of optional cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<Value>>>,
}

// NaN statistics are written as blank cells
fn stat_cell(v: f64) -> Option<Value> {
    if v.is_nan() { None } else { Some(Value::Float(v)) }
}

fn count_cell(n: usize) -> Option<Value> {
    Some(Value::Int(n as i64))
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Table {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn from_frequency(rows: &[FrequencyRow], column: &str, labels: &Labels) -> Self {
        let mut table = Table::new(
            labels.frequency_sheet.clone(),
            vec![
                column.to_string(),
                labels.absolute.clone(),
                labels.relative.clone(),
            ],
        );
        table.rows = rows
            .iter()
            .map(|r| {
                vec![
                    Some(r.value.clone()),
                    count_cell(r.absolute),
                    Some(Value::Float(r.relative)),
                ]
            })
            .collect();
        table
    }

    pub fn from_stats(rows: &[GroupStatsRow], group_column: &str, labels: &Labels) -> Self {
        let mut table = Table::new(
            labels.stats_sheet.clone(),
            vec![
                group_column.to_string(),
                labels.count.clone(),
                labels.mean.clone(),
                labels.median.clone(),
                labels.mode.clone(),
                labels.std_dev.clone(),
                labels.variance.clone(),
            ],
        );
        table.rows = rows
            .iter()
            .map(|r| {
                vec![
                    Some(r.group.clone()),
                    count_cell(r.count),
                    stat_cell(r.mean),
                    stat_cell(r.median),
                    stat_cell(r.mode),
                    stat_cell(r.std_dev),
                    stat_cell(r.variance),
                ]
            })
            .collect();
        table
    }

    /// One row per period, one column per group.
    pub fn from_trend(matrix: &TrendMatrix, period_column: &str, labels: &Labels) -> Self {
        let mut columns = vec![period_column.to_string()];
        columns.extend(matrix.groups.iter().map(|g| g.to_string()));

        let mut table = Table::new(labels.trend_sheet.clone(), columns);
        table.rows = matrix
            .periods
            .iter()
            .zip(&matrix.values)
            .map(|(period, means)| {
                let mut row = vec![Some(period.clone())];
                row.extend(means.iter().map(|m| Some(Value::Float(*m))));
                row
            })
            .collect();
        table
    }
}
