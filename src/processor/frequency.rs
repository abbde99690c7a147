use std::collections::HashMap;
use tracing::debug;

use crate::processor::{AnalyzerError, Value, dataset::Dataset};

/// One distinct value of a column and how often it occurs
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRow {
    pub value: Value,
    /// Number of rows holding `value`
    pub absolute: usize,
    /// `absolute` over the number of non-missing rows
    pub relative: f64,
}

/// Absolute and relative frequencies of the distinct values of `column`
///
/// Missing cells are left out of both the counts and the denominator. Rows
/// are sorted by descending count; equal counts keep the order in which the
/// values were first seen.
///
/// # Errors
/// [`AnalyzerError::ColumnNotFound`] if the dataset has no such column.
///
/// # Example
/// ```rust
/// # use sheet_analyzer::{Dataset, Value, frequency};
/// let dataset = Dataset::from_rows(
///     vec!["Loc".into()],
///     vec![vec![Some("A".into())], vec![Some("A".into())], vec![Some("B".into())]],
/// );
/// let rows = frequency(&dataset, "Loc").unwrap();
/// assert_eq!(rows[0].value, Value::from("A"));
/// assert_eq!(rows[0].absolute, 2);
/// ```
pub fn frequency(dataset: &Dataset, column: &str) -> Result<Vec<FrequencyRow>, AnalyzerError> {
    let col = dataset.get_col(column)?;

    // value -> (count, first seen)
    let mut counts: HashMap<Value, (usize, usize)> = HashMap::new();
    let mut total = 0usize;
    for value in col.iter_values().flatten() {
        let next = counts.len();
        let entry = counts.entry(value).or_insert((0, next));
        entry.0 += 1;
        total += 1;
    }

    let mut counted: Vec<(Value, (usize, usize))> = counts.into_iter().collect();
    counted.sort_by(|(_, (ca, fa)), (_, (cb, fb))| cb.cmp(ca).then(fa.cmp(fb)));

    debug!(
        column,
        distinct = counted.len(),
        observations = total,
        "frequency table"
    );

    Ok(counted
        .into_iter()
        .map(|(value, (count, _))| FrequencyRow {
            value,
            absolute: count,
            relative: count as f64 / total as f64,
        })
        .collect())
}
