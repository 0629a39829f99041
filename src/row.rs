//! Row and cell model shared by every pipeline stage
//!
//! A row is an ordered mapping from column identifier to [`Value`]. Keys are
//! either bare (`age`) or qualified (`student.age`). Insertion order is kept
//! and becomes the output field order.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing side of an outer join, or a projected key the row lacks
    Null,
    /// Raw text as loaded from a table
    Text(String),
    /// Aggregate output
    Number(f64),
}

impl Value {
    /// Creates a text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Returns true for [`Value::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the text if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a numeric cell
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Coerces the cell to a float. Anything non-numeric becomes NaN.
    ///
    /// The whole trimmed text must parse; `"10kg"` is NaN, not 10.
    pub fn to_f64(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            Value::Null => f64::NAN,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => fmt_number(*n, f),
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "inf" } else { "-inf" })
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Number(n) if !n.is_finite() => serializer.serialize_str(&self.to_string()),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// Splits `table.column` into its parts. Bare names yield `None` as qualifier.
pub fn split_qualified(field: &str) -> (Option<&str>, &str) {
    match field.split_once('.') {
        Some((table, column)) => (Some(table), column),
        None => (None, field),
    }
}

/// An ordered record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, Value>,
}

impl Row {
    /// Creates an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a text row from `(column, value)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Inserts or overwrites a cell. Overwriting keeps the key's position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.cells.insert(key.into(), value);
    }

    /// Exact key lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }

    /// Two-tier lookup used for join keys and joined field resolution.
    ///
    /// Tries the field exactly as written (`student.id`), then its bare
    /// column name (`id`). Null cells count as absent.
    pub fn lookup(&self, field: &str) -> Option<&Value> {
        let present = |key: &str| self.cells.get(key).filter(|v| !v.is_null());
        present(field).or_else(|| match split_qualified(field) {
            (Some(_), column) => present(column),
            (None, _) => None,
        })
    }

    /// Column names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Cells in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_prefers_qualified_key() {
        let row = Row::from_pairs([("student.id", "7"), ("id", "1")]);
        assert_eq!(row.lookup("student.id"), Some(&Value::text("7")));
    }

    #[test]
    fn test_lookup_falls_back_to_bare_key() {
        let row = Row::from_pairs([("id", "1")]);
        assert_eq!(row.lookup("student.id"), Some(&Value::text("1")));
        assert_eq!(row.lookup("id"), Some(&Value::text("1")));
        assert_eq!(row.lookup("student.name"), None);
    }

    #[test]
    fn test_lookup_treats_null_as_absent() {
        let mut row = Row::new();
        row.insert("student.id", Value::Null);
        assert_eq!(row.lookup("student.id"), None);
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut row = Row::from_pairs([("a", "1"), ("b", "2")]);
        row.insert("a", Value::text("3"));
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&Value::text("3")));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Number(2.0).to_string(), "2");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_to_f64_is_permissive() {
        assert_eq!(Value::text(" 42 ").to_f64(), 42.0);
        assert!(Value::text("abc").to_f64().is_nan());
        assert!(Value::Null.to_f64().is_nan());
    }

    #[test]
    fn test_row_serializes_in_order() {
        let mut row = Row::from_pairs([("name", "A")]);
        row.insert("COUNT(*)", Value::Number(2.0));
        row.insert("missing", Value::Null);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"name":"A","COUNT(*)":2,"missing":null}"#);
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(split_qualified("student.name"), (Some("student"), "name"));
        assert_eq!(split_qualified("name"), (None, "name"));
    }
}
