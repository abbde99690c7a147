use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::processor::{AnalyzerError, Value, dataset::Dataset};

/// Mean measurement of one group in one period
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub period: Value,
    pub group: Value,
    pub mean: f64,
}

/// Period × group matrix of mean measurements
///
/// `values[p][g]` holds the mean for `periods[p]` and `groups[g]`; a
/// combination that never occurs in the data holds 0.0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendMatrix {
    pub periods: Vec<Value>,
    pub groups: Vec<Value>,
    pub values: Vec<Vec<f64>>,
}

impl TrendMatrix {
    pub fn get(&self, period: &Value, group: &Value) -> Option<f64> {
        let p = self.periods.binary_search(period).ok()?;
        let g = self.groups.binary_search(group).ok()?;
        Some(self.values[p][g])
    }

    /// One line-chart series: the group's value in every period.
    pub fn series(&self, group: &Value) -> Option<Vec<f64>> {
        let g = self.groups.binary_search(group).ok()?;
        Some(self.values.iter().map(|row| row[g]).collect())
    }
}

/// Mean of `measure_col` per (period, group), ordered by period then group
///
/// Rows missing any of the three cells are skipped.
///
/// # Errors
/// [`AnalyzerError::ColumnNotFound`] if a column is absent,
/// [`AnalyzerError::NonNumericColumn`] if `measure_col` is not numeric.
pub fn trend(
    dataset: &Dataset,
    period_col: &str,
    group_col: &str,
    measure_col: &str,
) -> Result<Vec<TrendRow>, AnalyzerError> {
    let periods = dataset.get_col(period_col)?;
    let groups = dataset.get_col(group_col)?;
    let measures = dataset.numeric_col(measure_col)?;

    // (period, group) -> (sum, count)
    let mut cells: HashMap<(Value, Value), (f64, usize)> = HashMap::new();
    let keyed = periods.iter_values().zip(groups.iter_values()).zip(measures);
    for ((period, group), measurement) in keyed {
        let (Some(period), Some(group), Some(v)) = (period, group, measurement) else {
            continue;
        };
        let cell = cells.entry((period, group)).or_insert((0.0, 0));
        cell.0 += v;
        cell.1 += 1;
    }

    let mut rows: Vec<TrendRow> = cells
        .into_iter()
        .map(|((period, group), (sum, count))| TrendRow {
            period,
            group,
            mean: sum / count as f64,
        })
        .collect();
    rows.sort_by(|a, b| a.period.cmp(&b.period).then_with(|| a.group.cmp(&b.group)));

    debug!(period_col, group_col, measure_col, cells = rows.len(), "trend");
    Ok(rows)
}

/// Reshapes trend rows into a period × group matrix, filling gaps with 0.0.
pub fn pivot(rows: &[TrendRow]) -> TrendMatrix {
    let periods: Vec<Value> = rows
        .iter()
        .map(|r| r.period.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let groups: Vec<Value> = rows
        .iter()
        .map(|r| r.group.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut values = vec![vec![0.0; groups.len()]; periods.len()];
    for row in rows {
        if let (Ok(p), Ok(g)) = (
            periods.binary_search(&row.period),
            groups.binary_search(&row.group),
        ) {
            values[p][g] = row.mean;
        }
    }

    TrendMatrix {
        periods,
        groups,
        values,
    }
}
