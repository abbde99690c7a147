use crate::processor::Value;

type ValueIter<'a> = Box<dyn Iterator<Item = Option<Value>> + 'a>;
pub type NumericIter<'a> = Box<dyn Iterator<Item = Option<f64>> + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
    Bool,
    Str,
}

/// Typed storage for one column; `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    Str(Vec<Option<String>>),
}

impl Column {
    /// Picks the narrowest type that holds every non-missing cell.
    ///
    /// A column with no values at all is `Float64`, so it still counts as
    /// numeric.
    pub fn infer_type(cells: &[Option<Value>]) -> ColumnType {
        let mut has_int = false;
        let mut has_float = false;
        let mut has_bool = false;

        for cell in cells.iter().flatten() {
            match cell {
                Value::Int(_) => has_int = true,
                Value::Float(_) => has_float = true,
                Value::Bool(_) => has_bool = true,
                Value::Str(_) => return ColumnType::Str,
            }
        }

        match (has_int, has_float, has_bool) {
            (_, _, true) if has_int || has_float => ColumnType::Str,
            (_, _, true) => ColumnType::Bool,
            (true, false, false) => ColumnType::Int64,
            _ => ColumnType::Float64,
        }
    }

    pub fn from_cells(cells: Vec<Option<Value>>) -> Self {
        match Self::infer_type(&cells) {
            ColumnType::Int64 => Column::Int64(
                cells
                    .into_iter()
                    .map(|c| match c {
                        Some(Value::Int(v)) => Some(v),
                        _ => None,
                    })
                    .collect(),
            ),
            ColumnType::Float64 => Column::Float64(
                cells
                    .into_iter()
                    .map(|c| c.and_then(|v| v.as_f64()))
                    .collect(),
            ),
            ColumnType::Bool => Column::Bool(
                cells
                    .into_iter()
                    .map(|c| match c {
                        Some(Value::Bool(v)) => Some(v),
                        _ => None,
                    })
                    .collect(),
            ),
            ColumnType::Str => Column::Str(
                cells
                    .into_iter()
                    .map(|c| {
                        c.map(|v| match v {
                            Value::Str(s) => s,
                            other => other.to_string(),
                        })
                    })
                    .collect(),
            ),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Float64(_) => ColumnType::Float64,
            Column::Bool(_) => ColumnType::Bool,
            Column::Str(_) => ColumnType::Str,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int64(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            Column::Int64(v) => v.iter().filter(|c| c.is_none()).count(),
            Column::Float64(v) => v.iter().filter(|c| c.is_none()).count(),
            Column::Bool(v) => v.iter().filter(|c| c.is_none()).count(),
            Column::Str(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    // Random access
    pub fn get(&self, idx: usize) -> Option<Value> {
        match self {
            Column::Int64(v) => v.get(idx).copied().flatten().map(Value::Int),
            Column::Float64(v) => v.get(idx).copied().flatten().map(Value::Float),
            Column::Bool(v) => v.get(idx).copied().flatten().map(Value::Bool),
            Column::Str(v) => v.get(idx).cloned().flatten().map(Value::Str),
        }
    }

    pub fn iter_values(&self) -> ValueIter<'_> {
        match self {
            Column::Int64(v) => Box::new(v.iter().map(|c| c.map(Value::Int))) as ValueIter<'_>,
            Column::Float64(v) => Box::new(v.iter().map(|c| c.map(Value::Float))),
            Column::Bool(v) => Box::new(v.iter().map(|c| c.map(Value::Bool))),
            Column::Str(v) => Box::new(v.iter().map(|c| c.clone().map(Value::Str))),
        }
    }

    /// Numeric view of the column, `None` for bool and text columns.
    pub fn iter_f64(&self) -> Option<NumericIter<'_>> {
        match self {
            Column::Int64(v) => {
                Some(Box::new(v.iter().map(|c| c.map(|x| x as f64))) as NumericIter<'_>)
            }
            Column::Float64(v) => Some(Box::new(v.iter().copied()) as NumericIter<'_>),
            Column::Bool(_) | Column::Str(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_type() {
        let ints = vec![Some(Value::Int(1)), None, Some(Value::Int(3))];
        assert_eq!(Column::infer_type(&ints), ColumnType::Int64);

        let mixed_numbers = vec![Some(Value::Int(1)), Some(Value::Float(2.5))];
        assert_eq!(Column::infer_type(&mixed_numbers), ColumnType::Float64);

        let mixed = vec![Some(Value::Int(1)), Some(Value::from("x"))];
        assert_eq!(Column::infer_type(&mixed), ColumnType::Str);

        let empty: Vec<Option<Value>> = vec![None, None];
        assert_eq!(Column::infer_type(&empty), ColumnType::Float64);
    }

    #[test]
    fn test_mixed_column_renders_numbers_as_text() {
        let col = Column::from_cells(vec![Some(Value::Int(7)), Some(Value::from("B")), None]);
        assert_eq!(
            col,
            Column::Str(vec![Some("7".to_string()), Some("B".to_string()), None])
        );
        assert_eq!(col.null_count(), 1);
        assert!(col.iter_f64().is_none());
    }

    #[test]
    fn test_int_column_numeric_view() {
        let col = Column::from_cells(vec![Some(Value::Int(2)), None]);
        let values: Vec<Option<f64>> = col.iter_f64().unwrap().collect();
        assert_eq!(values, vec![Some(2.0), None]);
        assert_eq!(col.get(0), Some(Value::Int(2)));
        assert_eq!(col.get(1), None);
        assert_eq!(col.get(9), None);
    }
}
