use calamine::{Data, Reader, open_workbook_auto};
use memchr::memchr_iter;
use memmap2::Mmap;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::{fs::File, path::Path};
use tracing::{debug, info, warn};

use crate::{
    helpers::cells::{
        float_cell, normalize_headers, parse_decimal_comma_cell, parse_text_cell, text_cell,
    },
    processor::{
        AnalyzerError, Value,
        column::{Column, ColumnType, NumericIter},
    },
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// In-memory table loaded from a spreadsheet or delimited text file
///
/// # Examples
///
/// ```no_run
/// # use sheet_analyzer::Dataset;
/// let dataset = Dataset::load("monitoring.xlsx".as_ref(), None).unwrap();
/// println!("columns: {:?}", dataset.headers());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Builds a dataset from row-major cells.
    ///
    /// Header names are normalised, rows shorter than the header are padded
    /// with missing cells, extra trailing cells are dropped and rows with no
    /// values at all are skipped. Column types are inferred per column.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Option<Value>>>) -> Self {
        let headers = normalize_headers(headers);
        let width = headers.len();

        let mut cells: Vec<Vec<Option<Value>>> = (0..width)
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        let mut row_count = 0;
        let mut truncated = 0;

        for row in rows {
            let row: Vec<Option<Value>> = row
                .into_iter()
                .map(|cell| cell.filter(|v| !matches!(v, Value::Float(f) if f.is_nan())))
                .collect();
            if row.iter().all(Option::is_none) {
                continue;
            }
            if row.len() > width {
                truncated += 1;
            }

            let mut row = row.into_iter();
            for col in cells.iter_mut() {
                col.push(row.next().flatten());
            }
            row_count += 1;
        }

        if truncated > 0 {
            warn!(rows = truncated, "rows wider than the header were truncated");
        }

        let columns: Vec<Column> = cells.into_par_iter().map(Column::from_cells).collect();

        Dataset {
            headers,
            columns,
            row_count,
        }
    }

    /// Loads a file, picking the reader from its extension
    ///
    /// `.csv`, `.tsv` and `.txt` are read as delimited text; `.xlsx`, `.xlsm`,
    /// `.xlsb`, `.xls` and `.ods` as workbooks, from `sheet` or the first
    /// sheet.
    ///
    /// # Errors
    /// Returns [`AnalyzerError::FileRead`] if the file is missing, unreadable,
    /// of an unsupported type or has no header row.
    pub fn load(path: &Path, sheet: Option<&str>) -> Result<Self, AnalyzerError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let dataset = match extension.as_str() {
            "csv" | "tsv" | "txt" => Self::load_csv(path)?,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::load_workbook(path, sheet)?,
            other => {
                return Err(AnalyzerError::read(
                    path,
                    format!("unsupported file type {other:?}"),
                ));
            }
        };

        info!(
            path = %path.display(),
            rows = dataset.row_count,
            columns = dataset.headers.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Loads a delimited text file through a memory map
    ///
    /// The delimiter (`,`, `;` or tab) is sniffed from the header line.
    pub fn load_csv(path: &Path) -> Result<Self, AnalyzerError> {
        let file = File::open(path).map_err(|e| AnalyzerError::read(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| AnalyzerError::read(path, e))?
            .len();
        if len == 0 {
            return Err(AnalyzerError::read(path, "file is empty"));
        }

        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| AnalyzerError::read(path, e))?;
        let buf: &[u8] = mmap.strip_prefix(UTF8_BOM).unwrap_or(&mmap[..]);

        let delimiter = sniff_delimiter(buf);
        debug!(delimiter = %(delimiter as char).escape_default(), "csv delimiter");

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(buf);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AnalyzerError::read(path, e))?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AnalyzerError::read(path, "missing header line"));
        }

        let parse_cell = if delimiter == b';' {
            parse_decimal_comma_cell
        } else {
            parse_text_cell
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| AnalyzerError::read(path, e))?;
            rows.push(record.iter().map(parse_cell).collect());
        }

        Ok(Self::from_rows(headers, rows))
    }

    /// Loads one sheet of a workbook; the first row holds the headers.
    pub fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<Self, AnalyzerError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| AnalyzerError::read(path, e))?;

        let sheet_name = match sheet {
            Some(name) => name.to_string(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| AnalyzerError::read(path, "workbook has no sheets"))?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| AnalyzerError::read(path, e))?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| AnalyzerError::read(path, format!("sheet {sheet_name:?} is empty")))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell_from_data(cell).map(|v| v.to_string()).unwrap_or_default())
            .collect();

        let rows = rows
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();

        debug!(sheet = %sheet_name, "workbook sheet read");
        Ok(Self::from_rows(headers, rows))
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn get_col(&self, col_name: &str) -> Result<&Column, AnalyzerError> {
        let col_pos = self
            .headers
            .iter()
            .position(|cn| cn == col_name)
            .ok_or_else(|| AnalyzerError::ColumnNotFound(col_name.to_string()))?;

        self.columns
            .get(col_pos)
            .ok_or_else(|| AnalyzerError::ColumnNotFound(col_name.to_string()))
    }

    /// Numeric cells of a column
    ///
    /// # Errors
    /// [`AnalyzerError::ColumnNotFound`] or, for bool and text columns,
    /// [`AnalyzerError::NonNumericColumn`].
    pub fn numeric_col(&self, col_name: &str) -> Result<NumericIter<'_>, AnalyzerError> {
        let col = self.get_col(col_name)?;
        col.iter_f64()
            .ok_or_else(|| AnalyzerError::NonNumericColumn(col_name.to_string()))
    }

    pub fn column_type(&self, col_name: &str) -> Result<ColumnType, AnalyzerError> {
        self.get_col(col_name).map(Column::column_type)
    }
}

/// Picks the most frequent of `,`, `;` and tab on the first line.
fn sniff_delimiter(buf: &[u8]) -> u8 {
    let line_end = memchr::memchr(b'\n', buf).unwrap_or(buf.len());
    let header = &buf[..line_end];

    let mut best = (b',', 0usize);
    for candidate in [b',', b';', b'\t'] {
        let count = memchr_iter(candidate, header).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

fn cell_from_data(cell: &Data) -> Option<Value> {
    match cell {
        Data::Int(v) => Some(Value::Int(*v)),
        Data::Float(v) => float_cell(*v),
        Data::Bool(v) => Some(Value::Bool(*v)),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => text_cell(s),
        Data::DateTime(dt) => float_cell(dt.as_f64()),
        Data::Error(_) | Data::Empty => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dataset_from_str(csv: &'_ str) -> Dataset {
        use std::io::Write;
        use tempfile::Builder;

        // write CSV to temp file
        let mut tmp = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(tmp, "{}", csv).unwrap();

        Dataset::load(tmp.path(), None).unwrap()
    }

    #[test]
    fn test_row_count() {
        let csv = "id,value\n1,10\n2,20\n3,30\n";
        let dataset = make_dataset_from_str(csv);
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.column_type("value").unwrap(), ColumnType::Int64);
    }

    #[test]
    fn test_semicolon_delimiter_and_quotes() {
        let csv = "Localización;Profundidad (m)\n\"Bahía; Norte\";12,5\nSur;8\n";
        let dataset = make_dataset_from_str(csv);
        assert_eq!(dataset.headers(), ["Localización", "Profundidad (m)"]);
        assert_eq!(
            dataset.get_col("Localización").unwrap().get(0),
            Some(Value::from("Bahía; Norte"))
        );
        let depth: Vec<Option<f64>> = dataset.numeric_col("Profundidad (m)").unwrap().collect();
        assert_eq!(depth, vec![Some(12.5), Some(8.0)]);
    }

    #[test]
    fn test_missing_cells_and_ragged_rows() {
        let csv = "Loc,Depth\nA,1.5\nB\n,NA\nC,2,extra\n";
        let dataset = make_dataset_from_str(csv);
        // the ",NA" row has no values and is skipped
        assert_eq!(dataset.row_count(), 3);
        let depth: Vec<Option<f64>> = dataset.numeric_col("Depth").unwrap().collect();
        assert_eq!(depth, vec![Some(1.5), None, Some(2.0)]);
    }

    #[test]
    fn test_bom_is_stripped() {
        let csv = "\u{feff}Loc\nA\n";
        let dataset = make_dataset_from_str(csv);
        assert!(dataset.has_column("Loc"));
    }

    #[test]
    fn test_unknown_column() {
        let dataset = make_dataset_from_str("Loc\nA\n");
        assert!(matches!(
            dataset.get_col("Zone"),
            Err(AnalyzerError::ColumnNotFound(name)) if name == "Zone"
        ));
        assert!(matches!(
            dataset.numeric_col("Loc"),
            Err(AnalyzerError::NonNumericColumn(_))
        ));
    }

    #[test]
    fn test_empty_and_unsupported_files() {
        let tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        assert!(matches!(
            Dataset::load(tmp.path(), None),
            Err(AnalyzerError::FileRead { .. })
        ));

        let tmp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        assert!(matches!(
            Dataset::load(tmp.path(), None),
            Err(AnalyzerError::FileRead { .. })
        ));
    }

    #[test]
    fn test_from_rows_drops_nan() {
        let dataset = Dataset::from_rows(
            vec!["x".to_string()],
            vec![vec![Some(Value::Float(f64::NAN))], vec![Some(Value::Float(1.0))]],
        );
        assert_eq!(dataset.row_count(), 1);
    }
}
