use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod column;
pub mod dataset;
pub mod frequency;
pub mod report;
pub mod session;
pub mod stats;
pub mod trend;

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("could not read {}: {reason}", .path.display())]
    FileRead { path: PathBuf, reason: String },

    #[error("could not write {}: {reason}", .path.display())]
    FileWrite { path: PathBuf, reason: String },

    #[error("Missing column: {0}")]
    ColumnNotFound(String),

    #[error("Column is not numeric: {0}")]
    NonNumericColumn(String),

    #[error("No file has been loaded")]
    NoDataset,

    #[error("Nothing to save: no column has been analysed yet")]
    NothingToSave,

    #[error("Invalid profile: {0}")]
    Config(String),
}

impl AnalyzerError {
    pub fn read(path: &Path, reason: impl fmt::Display) -> Self {
        AnalyzerError::FileRead {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: &Path, reason: impl fmt::Display) -> Self {
        AnalyzerError::FileWrite {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// A non-missing cell value. Missing cells are `None` wherever a `Value`
/// is optional.
#[derive(Debug, Clone)]
pub enum Value {
    /// Integer cell
    Int(i64),
    /// Float cell, never NaN
    Float(f64),
    /// Boolean cell
    Bool(bool),
    /// Text cell
    Str(String),
}

impl Value {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(_) | Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Str(_) => 2,
        }
    }
}

// -0.0 and 0.0 are the same group key
fn float_bits(v: f64) -> u64 {
    (v + 0.0).to_bits()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_bits(*a) == float_bits(*b),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int(v) => v.hash(state),
            Value::Float(v) => float_bits(*v).hash(state),
            Value::Bool(v) => v.hash(state),
            Value::Str(v) => v.hash(state),
        }
    }
}

impl Ord for Value {
    /// Booleans sort before numbers, numbers before text. Ints and floats
    /// compare numerically; an int sorts before a float of equal magnitude.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => (a + 0.0).total_cmp(&(b + 0.0)),
            (Value::Int(a), Value::Float(b)) => (*a as f64)
                .total_cmp(&(b + 0.0))
                .then(Ordering::Less),
            (Value::Float(a), Value::Int(b)) => (a + 0.0)
                .total_cmp(&(*b as f64))
                .then(Ordering::Greater),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_negative_zero_is_same_key() {
        let mut keys = HashSet::new();
        keys.insert(Value::Float(0.0));
        keys.insert(Value::Float(-0.0));
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_ordering_across_kinds() {
        let mut values = vec![
            Value::from("b"),
            Value::Float(2.5),
            Value::Bool(true),
            Value::Int(3),
            Value::from("a"),
            Value::Int(1),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Bool(true),
                Value::Int(1),
                Value::Float(2.5),
                Value::Int(3),
                Value::from("a"),
                Value::from("b"),
            ]
        );
    }

    #[test]
    fn test_error_messages_name_the_path() {
        let err = AnalyzerError::read(Path::new("missing.xlsx"), "not found");
        assert_eq!(err.to_string(), "could not read missing.xlsx: not found");
    }
}
