//! Final projection

use crate::row::{Row, Value};

/// Reduces rows to the requested SELECT fields
pub struct Projector;

impl Projector {
    /// Projects every row. Missing keys become `Null`.
    pub fn project(rows: &[Row], fields: &[String]) -> Vec<Row> {
        rows.iter().map(|row| Self::project_row(row, fields)).collect()
    }

    /// Builds a row keyed exactly by `fields`, in that order
    pub fn project_row(row: &Row, fields: &[String]) -> Row {
        let mut out = Row::new();
        for field in fields {
            let value = row.get(field).cloned().unwrap_or(Value::Null);
            out.insert(field.as_str(), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_order_follows_fields() {
        let row = Row::from_pairs([("name", "A"), ("age", "19"), ("id", "1")]);
        let fields = vec!["age".to_string(), "name".to_string()];
        let out = Projector::project_row(&row, &fields);

        let keys: Vec<&str> = out.keys().collect();
        assert_eq!(keys, vec!["age", "name"]);
    }

    #[test]
    fn test_missing_field_is_null() {
        let row = Row::from_pairs([("name", "A")]);
        let out = Projector::project_row(&row, &["ghost".to_string()]);
        assert_eq!(out.get("ghost"), Some(&Value::Null));
    }

    #[test]
    fn test_projection_round_trip() {
        let row = Row::from_pairs([("name", "A"), ("age", "19")]);
        let fields: Vec<String> = row.keys().map(str::to_string).collect();
        assert_eq!(Projector::project_row(&row, &fields), row);
    }

    #[test]
    fn test_projects_every_row() {
        let rows = vec![Row::from_pairs([("a", "1")]), Row::from_pairs([("a", "2")])];
        let out = Projector::project(&rows, &["a".to_string()]);
        assert_eq!(out.len(), 2);
    }
}
