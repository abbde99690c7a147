//! # sheet-analyzer
//!
//! `sheet-analyzer` loads a spreadsheet or delimited text file and derives
//! summary tables from one of its columns. It supports:
//!
//! - Workbook loading (`.xlsx`, `.xls`, `.ods`, ...) and memory-mapped CSV
//!   loading with delimiter sniffing
//! - Per-column type inference (int, float, bool, text) with missing cells
//! - Frequency tables: absolute counts and relative proportions
//! - Grouped statistics: count, mean, median, mode, sample std dev and variance
//! - Trend pivots: mean measurement per period and group
//! - Export to multi-sheet `.xlsx` workbooks or one CSV per table
//!
//! # Example
//!
//! ```no_run
//! use sheet_analyzer::{AnalysisProfile, Session};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::new(AnalysisProfile::environmental());
//!
//!     // Load the workbook and pick a column
//!     session.load(Path::new("monitoreo.xlsx"))?;
//!     println!("columns: {:?}", session.columns());
//!     let report = session.select("Localización")?;
//!
//!     for row in &report.frequency {
//!         println!("{} => {} ({:.4})", row.value, row.absolute, row.relative);
//!     }
//!
//!     // One sheet per derived table
//!     session.save(Path::new("analisis.xlsx"))?;
//!     Ok(())
//! }
//! ```

mod helpers;
pub mod export;
pub mod processor;
pub mod profile;
pub mod render;
pub mod table;

pub use processor::{
    AnalyzerError, Value,
    column::{Column, ColumnType},
    dataset::Dataset,
    frequency::{FrequencyRow, frequency},
    report::AnalysisReport,
    session::Session,
    stats::{GroupStatsRow, group_stats},
    trend::{TrendMatrix, TrendRow, pivot, trend},
};
pub use profile::{AnalysisProfile, Labels};
pub use table::Table;
