use tracing::debug;

use crate::processor::{
    AnalyzerError,
    dataset::Dataset,
    frequency::{FrequencyRow, frequency},
    stats::{GroupStatsRow, group_stats},
    trend::{TrendMatrix, pivot, trend},
};
use crate::profile::{AnalysisProfile, Labels};
use crate::table::Table;

/// Everything derived from one column selection
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// The selected column, also the grouping column
    pub column: String,
    pub frequency: Vec<FrequencyRow>,
    /// Present when the profile names a measurement column
    pub stats: Option<Vec<GroupStatsRow>>,
    /// Present when the profile also names a period column found in the data
    pub trend: Option<TrendMatrix>,
    period_column: Option<String>,
}

impl AnalysisReport {
    /// Runs every analysis the profile asks for on `column`.
    ///
    /// # Errors
    /// [`AnalyzerError::ColumnNotFound`] if `column` or the profile's
    /// measurement column is missing; a missing period column only skips
    /// the trend.
    pub fn compute(
        dataset: &Dataset,
        column: &str,
        profile: &AnalysisProfile,
    ) -> Result<Self, AnalyzerError> {
        let frequency = frequency(dataset, column)?;

        let stats = match &profile.measure {
            Some(measure) => Some(group_stats(dataset, column, measure)?),
            None => None,
        };

        let (trend, period_column) = match (&profile.measure, &profile.period) {
            (Some(measure), Some(period)) if dataset.has_column(period) => {
                let rows = trend(dataset, period, column, measure)?;
                (Some(pivot(&rows)), Some(period.clone()))
            }
            (Some(_), Some(period)) => {
                debug!(period = %period, "period column not in dataset, trend skipped");
                (None, None)
            }
            _ => (None, None),
        };

        Ok(AnalysisReport {
            column: column.to_string(),
            frequency,
            stats,
            trend,
            period_column,
        })
    }

    /// The report as named tables: frequency, then statistics and trend
    /// when computed.
    pub fn tables(&self, labels: &Labels) -> Vec<Table> {
        let mut tables = vec![Table::from_frequency(&self.frequency, &self.column, labels)];
        if let Some(stats) = &self.stats {
            tables.push(Table::from_stats(stats, &self.column, labels));
        }
        if let (Some(matrix), Some(period)) = (&self.trend, &self.period_column) {
            tables.push(Table::from_trend(matrix, period, labels));
        }
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::Value;

    fn monitoring() -> Dataset {
        Dataset::from_rows(
            vec![
                "Localización".to_string(),
                "Profundidad (m)".to_string(),
                "Año de Monitoreo".to_string(),
            ],
            vec![
                vec![Some("A".into()), Some(Value::Float(1.5)), Some(Value::Int(2020))],
                vec![Some("A".into()), Some(Value::Float(2.5)), Some(Value::Int(2021))],
                vec![Some("B".into()), Some(Value::Float(4.0)), Some(Value::Int(2020))],
            ],
        )
    }

    #[test]
    fn test_generic_profile_only_counts() {
        let report =
            AnalysisReport::compute(&monitoring(), "Localización", &AnalysisProfile::generic())
                .unwrap();
        assert!(report.stats.is_none());
        assert!(report.trend.is_none());
        assert_eq!(report.tables(&Labels::default()).len(), 1);
    }

    #[test]
    fn test_environmental_profile() {
        let report = AnalysisReport::compute(
            &monitoring(),
            "Localización",
            &AnalysisProfile::environmental(),
        )
        .unwrap();

        assert_eq!(report.stats.as_ref().unwrap().len(), 2);
        let matrix = report.trend.as_ref().unwrap();
        assert_eq!(matrix.get(&Value::Int(2021), &Value::from("B")), Some(0.0));

        let tables = report.tables(&Labels::default());
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Frecuencias", "Estadisticas", "Tendencia"]);
        assert_eq!(tables[2].columns[0], "Año de Monitoreo");
    }

    #[test]
    fn test_missing_period_skips_trend() {
        let mut profile = AnalysisProfile::environmental();
        profile.period = Some("Temporada".into());
        let report = AnalysisReport::compute(&monitoring(), "Localización", &profile).unwrap();
        assert!(report.stats.is_some());
        assert!(report.trend.is_none());
    }

    #[test]
    fn test_missing_measure_is_an_error() {
        let mut profile = AnalysisProfile::environmental();
        profile.measure = Some("Salinidad".into());
        assert!(matches!(
            AnalysisReport::compute(&monitoring(), "Localización", &profile),
            Err(AnalyzerError::ColumnNotFound(name)) if name == "Salinidad"
        ));
    }
}
