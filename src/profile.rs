//! Analysis profiles: which columns to measure and how output is labelled.
//!
//! ```toml
//! measure = "Profundidad (m)"
//! period = "Año de Monitoreo"
//! decimals = 3
//!
//! [labels]
//! frequency_sheet = "Frecuencias"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::processor::AnalyzerError;

/// Headings and sheet names used for exported tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub absolute: String,
    pub relative: String,
    pub count: String,
    pub mean: String,
    pub median: String,
    pub mode: String,
    pub std_dev: String,
    pub variance: String,
    pub frequency_sheet: String,
    pub stats_sheet: String,
    pub trend_sheet: String,
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            absolute: "Frecuencia Absoluta".into(),
            relative: "Frecuencia Relativa".into(),
            count: "Conteo".into(),
            mean: "Media".into(),
            median: "Mediana".into(),
            mode: "Moda".into(),
            std_dev: "Desviación Estándar".into(),
            variance: "Varianza".into(),
            frequency_sheet: "Frecuencias".into(),
            stats_sheet: "Estadisticas".into(),
            trend_sheet: "Tendencia".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisProfile {
    /// Sheet to read from workbooks; the first sheet when unset
    pub sheet: Option<String>,
    /// Numeric column summarised per group
    pub measure: Option<String>,
    /// Time column for the trend pivot
    pub period: Option<String>,
    /// Decimal places shown on screen
    pub decimals: usize,
    pub labels: Labels,
}

impl Default for AnalysisProfile {
    fn default() -> Self {
        AnalysisProfile {
            sheet: None,
            measure: None,
            period: None,
            decimals: 4,
            labels: Labels::default(),
        }
    }
}

impl AnalysisProfile {
    /// Frequency tables only.
    pub fn generic() -> Self {
        Self::default()
    }

    /// Depth statistics per monitoring site and their yearly trend.
    pub fn environmental() -> Self {
        AnalysisProfile {
            measure: Some("Profundidad (m)".into()),
            period: Some("Año de Monitoreo".into()),
            ..Self::default()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "generic" => Some(Self::generic()),
            "environmental" => Some(Self::environmental()),
            _ => None,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AnalyzerError> {
        toml::from_str(text).map_err(|e| AnalyzerError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, AnalyzerError> {
        let text = std::fs::read_to_string(path).map_err(|e| AnalyzerError::read(path, e))?;
        Self::from_toml_str(&text)
    }
}
