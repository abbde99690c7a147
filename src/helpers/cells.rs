use std::collections::{HashMap, HashSet};

use crate::processor::Value;

/// Text read as a missing cell, on top of blank cells.
pub const MISSING_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "#N/A"];

// Largest magnitude where every whole f64 maps to a distinct i64
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

pub fn is_missing(text: &str) -> bool {
    text.is_empty() || MISSING_TOKENS.contains(&text)
}

/// Parses a delimited-text field, trying integer, float and boolean before
/// falling back to text.
pub fn parse_text_cell(raw: &str) -> Option<Value> {
    let text = raw.trim();
    if is_missing(text) {
        return None;
    }

    let bytes = text.as_bytes();
    if let Ok(v) = atoi_simd::parse::<i64>(bytes) {
        return Some(Value::Int(v));
    }
    if let Ok(v) = fast_float::parse::<f64, _>(bytes) {
        if v.is_finite() {
            return Some(Value::Float(v));
        }
    }

    match text {
        "true" | "True" | "TRUE" => Some(Value::Bool(true)),
        "false" | "False" | "FALSE" => Some(Value::Bool(false)),
        _ => Some(Value::Str(text.to_string())),
    }
}

/// Like [`parse_text_cell`], but reads `12,5` as 12.5. Used for
/// semicolon-delimited files, where the comma is the decimal separator.
pub fn parse_decimal_comma_cell(raw: &str) -> Option<Value> {
    let text = raw.trim();
    if memchr::memchr(b',', text.as_bytes()).is_some() && !text.contains('.') {
        let dotted = text.replacen(',', ".", 1);
        if let Ok(v) = fast_float::parse::<f64, _>(dotted.as_bytes()) {
            if v.is_finite() {
                return Some(Value::Float(v));
            }
        }
    }
    parse_text_cell(text)
}

/// A text cell from a typed source: never reinterpreted as a number.
pub fn text_cell(raw: &str) -> Option<Value> {
    let text = raw.trim();
    if is_missing(text) {
        None
    } else {
        Some(Value::Str(text.to_string()))
    }
}

/// Workbooks store every number as a float; whole ones come back as ints.
pub fn float_cell(v: f64) -> Option<Value> {
    if v.is_nan() {
        None
    } else if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT {
        Some(Value::Int(v as i64))
    } else {
        Some(Value::Float(v))
    }
}

/// Trims header names, names blank ones `Unnamed: <index>` and suffixes
/// repeats with `.1`, `.2`, ...
pub fn normalize_headers<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::new();

    for (idx, name) in raw.into_iter().enumerate() {
        let name = name.trim();
        let base = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        while seen.contains(&candidate) {
            let n = repeats.entry(base.clone()).or_insert(0);
            *n += 1;
            candidate = format!("{base}.{n}");
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}
