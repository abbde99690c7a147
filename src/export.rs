//! Writes tables to spreadsheet files, one sheet per table.

use rust_xlsxwriter::{Workbook, XlsxError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::processor::{AnalyzerError, Value};
use crate::table::Table;

/// Excel's limit on sheet name length.
const MAX_SHEET_NAME: usize = 31;
const MAX_COLUMNS: usize = 16_384;

/// Writes `tables` to `path`
///
/// An `.xlsx` target gets one worksheet per table. A `.csv` target is
/// written as one file per table next to it, named `<stem>-<sheet>.csv`.
///
/// # Errors
/// [`AnalyzerError::FileWrite`] if the target type is unsupported or the
/// file cannot be written.
pub fn write_workbook(path: &Path, tables: &[Table]) -> Result<(), AnalyzerError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" => write_xlsx(path, tables),
        "csv" => write_csv_set(path, tables).map(|_| ()),
        other => Err(AnalyzerError::write(
            path,
            format!("unsupported file type {other:?}"),
        )),
    }
}

fn write_xlsx(path: &Path, tables: &[Table]) -> Result<(), AnalyzerError> {
    let err = |e: XlsxError| AnalyzerError::write(path, e);
    let mut workbook = Workbook::new();
    let mut used = HashSet::new();

    for table in tables {
        if table.columns.len() > MAX_COLUMNS {
            return Err(AnalyzerError::write(
                path,
                format!("table {:?} has too many columns", table.name),
            ));
        }

        let name = sheet_name(&table.name, &mut used);
        let sheet = workbook.add_worksheet();
        sheet.set_name(name.as_str()).map_err(err)?;

        for (c, heading) in table.columns.iter().enumerate() {
            sheet.write_string(0, c as u16, heading.as_str()).map_err(err)?;
        }

        for (r, row) in table.rows.iter().enumerate() {
            let r = r as u32 + 1;
            for (c, cell) in row.iter().enumerate() {
                let c = c as u16;
                let written = match cell {
                    Some(Value::Int(v)) => sheet.write_number(r, c, *v as f64),
                    Some(Value::Float(v)) => sheet.write_number(r, c, *v),
                    Some(Value::Bool(v)) => sheet.write_boolean(r, c, *v),
                    Some(Value::Str(s)) => sheet.write_string(r, c, s.as_str()),
                    None => continue,
                };
                written.map_err(err)?;
            }
        }
        debug!(sheet = %name, rows = table.rows.len(), "worksheet written");
    }

    workbook.save(path).map_err(err)
}

/// Writes one CSV per table and returns the paths written
///
/// If any table fails, the files already written are removed again.
pub fn write_csv_set(path: &Path, tables: &[Table]) -> Result<Vec<PathBuf>, AnalyzerError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| AnalyzerError::write(path, "missing file name"))?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    let mut used = HashSet::new();
    let mut written: Vec<PathBuf> = Vec::with_capacity(tables.len());

    for table in tables {
        let target = dir.join(format!("{stem}-{}.csv", sheet_name(&table.name, &mut used)));
        if let Err(e) = write_csv(&target, table) {
            for done in &written {
                if let Err(cleanup) = fs::remove_file(done) {
                    warn!(path = %done.display(), error = %cleanup, "could not remove partial output");
                }
            }
            return Err(e);
        }
        written.push(target);
    }

    Ok(written)
}

fn write_csv(target: &Path, table: &Table) -> Result<(), AnalyzerError> {
    let err = |e: csv::Error| AnalyzerError::write(target, e);

    let mut writer = csv::Writer::from_path(target).map_err(err)?;
    writer.write_record(&table.columns).map_err(err)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|cell| match cell {
                Some(v) => v.to_string(),
                None => String::new(),
            }))
            .map_err(err)?;
    }
    writer
        .flush()
        .map_err(|e| AnalyzerError::write(target, e))
}

/// Makes `raw` a valid, unused sheet name: no `[]:*?/\`, no leading or
/// trailing apostrophe, at most 31 characters, unique ignoring case.
pub fn sheet_name(raw: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let cut: String = cleaned.trim().chars().take(MAX_SHEET_NAME).collect();
    let cut = trim_name(&cut);
    let base = if cut.is_empty() {
        format!("Sheet{}", used.len() + 1)
    } else {
        cut.to_string()
    };
    if base != raw {
        warn!(requested = raw, used = %base, "sheet name adjusted");
    }

    let mut candidate = base.clone();
    let mut n = 1;
    while used.contains(&candidate.to_lowercase()) {
        n += 1;
        let suffix = format!(" ({n})");
        let keep = MAX_SHEET_NAME - suffix.chars().count();
        let head: String = base.chars().take(keep).collect();
        candidate = format!("{}{suffix}", trim_name(&head));
    }

    used.insert(candidate.to_lowercase());
    candidate
}

/// Sheet names may not start or end with an apostrophe.
fn trim_name(name: &str) -> &str {
    name.trim().trim_matches('\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_name_rules() {
        let mut used = HashSet::new();
        assert_eq!(sheet_name("Frecuencias", &mut used), "Frecuencias");
        assert_eq!(sheet_name("frecuencias", &mut used), "frecuencias (2)");
        assert_eq!(sheet_name("a/b:c", &mut used), "abc");
        assert_eq!(sheet_name("", &mut used), "Sheet4");

        let long = "x".repeat(40);
        let first = sheet_name(&long, &mut used);
        assert_eq!(first.chars().count(), 31);
        let second = sheet_name(&long, &mut used);
        assert_eq!(second, format!("{} (2)", "x".repeat(27)));
    }

    #[test]
    fn test_sheet_name_apostrophe_after_cut() {
        let mut used = HashSet::new();
        let label = format!("{}'s", "y".repeat(30));
        let first = sheet_name(&label, &mut used);
        assert_eq!(first, "y".repeat(30));

        let padded = format!("{}'{}", "z".repeat(26), "z".repeat(10));
        let mut used = HashSet::from([padded[..31].to_lowercase()]);
        let second = sheet_name(&padded, &mut used);
        assert_eq!(second, format!("{} (2)", "z".repeat(26)));
        assert!(!second.starts_with('\'') && !second.ends_with('\''));

        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name(first.as_str()).unwrap();
        workbook.add_worksheet().set_name(second.as_str()).unwrap();
    }

    #[test]
    fn test_failed_csv_set_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the second file should go
        std::fs::create_dir(dir.path().join("analisis-Estadisticas.csv")).unwrap();

        let mut counts = Table::new("Frecuencias", vec!["Loc".into()]);
        counts.rows.push(vec![Some(Value::from("A"))]);
        let stats = Table::new("Estadisticas", vec!["Loc".into()]);

        let result = write_workbook(&dir.path().join("analisis.csv"), &[counts, stats]);
        assert!(matches!(result, Err(AnalyzerError::FileWrite { .. })));
        assert!(!dir.path().join("analisis-Frecuencias.csv").exists());
    }

    #[test]
    fn test_unsupported_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.ods");
        assert!(matches!(
            write_workbook(&target, &[]),
            Err(AnalyzerError::FileWrite { .. })
        ));
    }

    #[test]
    fn test_csv_set_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = Table::new("Frecuencias", vec!["Loc".into(), "n".into()]);
        table.rows.push(vec![Some(Value::from("A")), Some(Value::Int(2))]);
        table.rows.push(vec![Some(Value::from("B")), None]);

        let written = write_csv_set(&dir.path().join("analisis.csv"), &[table]).unwrap();
        assert_eq!(written, vec![dir.path().join("analisis-Frecuencias.csv")]);
        let text = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(text, "Loc,n\nA,2\nB,\n");
    }

    #[test]
    fn test_unwritable_xlsx_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing-dir").join("out.xlsx");
        let table = Table::new("Frecuencias", vec!["Loc".into()]);
        assert!(matches!(
            write_workbook(&target, &[table]),
            Err(AnalyzerError::FileWrite { .. })
        ));
    }
}
