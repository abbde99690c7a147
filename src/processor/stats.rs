use std::collections::HashMap;
use tracing::debug;

use crate::processor::{AnalyzerError, Value, dataset::Dataset};

/// Descriptive statistics of the measurements in one group
///
/// Every statistic is NaN for a group without measurements; `std_dev` and
/// `variance` are NaN below two measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStatsRow {
    pub group: Value,
    /// Non-missing measurements in the group
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Most frequent measurement, the smallest one on ties
    pub mode: f64,
    /// Sample standard deviation (N-1)
    pub std_dev: f64,
    /// Sample variance (N-1)
    pub variance: f64,
}

/// Running accumulator for one group.
///
/// Sums are taken relative to the first observation to keep the
/// sum-of-squares variance numerically stable.
#[derive(Debug, Default)]
struct Bucket {
    shift: f64,
    sum: f64,
    sum_sq: f64,
    observations: Vec<f64>,
}

impl Bucket {
    fn push(&mut self, v: f64) {
        if self.observations.is_empty() {
            self.shift = v;
        }
        let d = v - self.shift;
        self.sum += d;
        self.sum_sq += d * d;
        self.observations.push(v);
    }

    fn count(&self) -> usize {
        self.observations.len()
    }

    fn mean(&self) -> f64 {
        match self.count() {
            0 => f64::NAN,
            n => self.shift + self.sum / n as f64,
        }
    }

    fn variance(&self) -> f64 {
        let n = self.count();
        if n < 2 {
            return f64::NAN;
        }
        let n = n as f64;
        ((self.sum_sq - self.sum * self.sum / n) / (n - 1.0)).max(0.0)
    }

    fn finish(mut self, group: Value) -> GroupStatsRow {
        let mean = self.mean();
        let variance = self.variance();

        self.observations.sort_by(f64::total_cmp);
        let sorted = &self.observations;

        GroupStatsRow {
            group,
            count: sorted.len(),
            mean,
            median: median(sorted),
            mode: mode(sorted),
            std_dev: variance.sqrt(),
            variance,
        }
    }
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => f64::NAN,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Longest run in sorted input; the first (smallest) run wins ties.
fn mode(sorted: &[f64]) -> f64 {
    let mut best = (f64::NAN, 0usize);
    let mut run_start = 0;

    for i in 1..=sorted.len() {
        if i == sorted.len() || sorted[i] != sorted[run_start] {
            let run = i - run_start;
            if run > best.1 {
                best = (sorted[run_start], run);
            }
            run_start = i;
        }
    }

    best.0
}

/// Per-group statistics of a numeric measurement column
///
/// Rows with a missing group are skipped. A group whose measurements are
/// all missing is still reported, with NaN statistics. Groups come back in
/// ascending key order.
///
/// # Errors
/// [`AnalyzerError::ColumnNotFound`] if either column is absent,
/// [`AnalyzerError::NonNumericColumn`] if `measure_col` is not numeric.
pub fn group_stats(
    dataset: &Dataset,
    group_col: &str,
    measure_col: &str,
) -> Result<Vec<GroupStatsRow>, AnalyzerError> {
    let groups = dataset.get_col(group_col)?;
    let measures = dataset.numeric_col(measure_col)?;

    let mut buckets: HashMap<Value, Bucket> = HashMap::new();
    for (key, measurement) in groups.iter_values().zip(measures) {
        let Some(key) = key else { continue };
        let bucket = buckets.entry(key).or_default();
        if let Some(v) = measurement {
            bucket.push(v);
        }
    }

    let mut rows: Vec<GroupStatsRow> = buckets
        .into_iter()
        .map(|(key, bucket)| bucket.finish(key))
        .collect();
    rows.sort_by(|a, b| a.group.cmp(&b.group));

    debug!(group_col, measure_col, groups = rows.len(), "group statistics");
    Ok(rows)
}
