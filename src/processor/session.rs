use std::path::{Path, PathBuf};
use tracing::info;

use crate::export::write_workbook;
use crate::processor::{AnalyzerError, dataset::Dataset, report::AnalysisReport};
use crate::profile::AnalysisProfile;

/// One analysis session: the loaded dataset and the latest report
///
/// Every action either succeeds or leaves the session as it was.
///
/// # Example
/// ```no_run
/// # use sheet_analyzer::{AnalysisProfile, Session};
/// let mut session = Session::new(AnalysisProfile::environmental());
/// session.load("monitoreo.xlsx".as_ref()).unwrap();
/// session.select("Localización").unwrap();
/// session.save("analisis.xlsx".as_ref()).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct Session {
    profile: AnalysisProfile,
    source: Option<PathBuf>,
    dataset: Option<Dataset>,
    report: Option<AnalysisReport>,
}

impl Session {
    pub fn new(profile: AnalysisProfile) -> Self {
        Session {
            profile,
            ..Self::default()
        }
    }

    pub fn profile(&self) -> &AnalysisProfile {
        &self.profile
    }

    /// Replaces the dataset with the contents of `path`
    ///
    /// The previous report is discarded on success. On failure the previous
    /// dataset and report stay in place.
    pub fn load(&mut self, path: &Path) -> Result<&Dataset, AnalyzerError> {
        let dataset = Dataset::load(path, self.profile.sheet.as_deref())?;
        self.source = Some(path.to_path_buf());
        self.report = None;
        Ok(self.dataset.insert(dataset))
    }

    /// The file the current dataset came from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The loaded dataset, if any.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Column names to choose from; empty before a file is loaded.
    pub fn columns(&self) -> &[String] {
        self.dataset.as_ref().map(Dataset::headers).unwrap_or_default()
    }

    /// Recomputes the report for `column`
    pub fn select(&mut self, column: &str) -> Result<&AnalysisReport, AnalyzerError> {
        let dataset = self.dataset.as_ref().ok_or(AnalyzerError::NoDataset)?;
        let report = AnalysisReport::compute(dataset, column, &self.profile)?;
        Ok(self.report.insert(report))
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// Writes the current report's tables to `path`
    pub fn save(&self, path: &Path) -> Result<(), AnalyzerError> {
        let report = self.report.as_ref().ok_or(AnalyzerError::NothingToSave)?;
        let tables = report.tables(&self.profile.labels);
        write_workbook(path, &tables)?;
        info!(path = %path.display(), sheets = tables.len(), "analysis saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(tmp, "{}", contents).unwrap();
        tmp
    }

    #[test]
    fn test_actions_out_of_order() {
        let mut session = Session::default();
        assert!(session.columns().is_empty());
        assert!(matches!(session.select("Loc"), Err(AnalyzerError::NoDataset)));
        assert!(matches!(
            session.save(Path::new("out.xlsx")),
            Err(AnalyzerError::NothingToSave)
        ));
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let good = csv_file("Loc\nA\nB\n");
        let mut session = Session::default();
        session.load(good.path()).unwrap();
        session.select("Loc").unwrap();

        let missing = good.path().with_file_name("does-not-exist.csv");
        assert!(matches!(
            session.load(&missing),
            Err(AnalyzerError::FileRead { .. })
        ));
        assert_eq!(session.columns(), ["Loc"]);
        assert_eq!(session.dataset().map(Dataset::row_count), Some(2));
        assert_eq!(session.source(), Some(good.path()));
        assert!(session.report().is_some());
    }

    #[test]
    fn test_new_load_clears_report() {
        let first = csv_file("Loc\nA\n");
        let second = csv_file("Zone,Depth\nN,1\n");
        let mut session = Session::default();
        session.load(first.path()).unwrap();
        session.select("Loc").unwrap();

        session.load(second.path()).unwrap();
        assert!(session.report().is_none());
        assert_eq!(session.columns(), ["Zone", "Depth"]);
    }

    #[test]
    fn test_failed_select_keeps_report() {
        let file = csv_file("Loc\nA\n");
        let mut session = Session::default();
        session.load(file.path()).unwrap();
        session.select("Loc").unwrap();

        assert!(matches!(
            session.select("Zone"),
            Err(AnalyzerError::ColumnNotFound(_))
        ));
        assert_eq!(session.report().unwrap().column, "Loc");
    }
}
