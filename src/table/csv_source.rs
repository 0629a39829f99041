//! CSV directory table source
//!
//! A table named `student` is read from `<root>/student.csv`. The first
//! record is the header; every cell is loaded as text.

use std::path::{Path, PathBuf};

use crate::row::Row;

use super::errors::{TableError, TableResult};
use super::{LoadFuture, TableSource};

/// Loads tables from delimited files in one directory
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    root: PathBuf,
    extension: String,
    delimiter: u8,
}

impl CsvTableSource {
    /// Creates a source reading `<root>/<table>.csv` with `,` delimiters
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "csv".to_string(),
            delimiter: b',',
        }
    }

    /// Sets the file extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a table name to its file. Names that could escape the root are rejected.
    pub fn table_path(&self, name: &str) -> TableResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(TableError::NotFound(name.to_string()));
        }
        Ok(self.root.join(format!("{}.{}", name, self.extension)))
    }

    /// Parses delimited bytes into rows
    pub fn parse(&self, name: &str, bytes: &[u8]) -> TableResult<Vec<Row>> {
        let csv_err = |source| TableError::Csv {
            table: name.to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers = reader.headers().map_err(csv_err)?.clone();

        reader
            .records()
            .map(|record| {
                let record = record.map_err(csv_err)?;
                Ok(Row::from_pairs(headers.iter().zip(record.iter())))
            })
            .collect()
    }
}

impl TableSource for CsvTableSource {
    fn load_table<'a>(&'a self, name: &'a str) -> LoadFuture<'a> {
        Box::pin(async move {
            let path = self.table_path(name)?;
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| TableError::from_io(name, e))?;
            self.parse(name, &bytes)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Value;
    use tempfile::TempDir;

    fn write_table(dir: &TempDir, file: &str, content: &str) {
        std::fs::write(dir.path().join(file), content).unwrap();
    }

    #[tokio::test]
    async fn test_load_csv() {
        let dir = TempDir::new().unwrap();
        write_table(&dir, "student.csv", "id,name,age\n1,John,30\n2,Jane,25\n");

        let source = CsvTableSource::new(dir.path());
        let rows = source.load_table("student").await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some(&Value::text("John")));
        assert_eq!(rows[1].get("age"), Some(&Value::text("25")));
        let keys: Vec<&str> = rows[0].keys().collect();
        assert_eq!(keys, vec!["id", "name", "age"]);
    }

    #[tokio::test]
    async fn test_custom_delimiter_and_extension() {
        let dir = TempDir::new().unwrap();
        write_table(&dir, "dept.tsv", "code\tname\nhr\tHuman Resources\n");

        let source = CsvTableSource::new(dir.path())
            .with_extension("tsv")
            .with_delimiter(b'\t');
        let rows = source.load_table("dept").await.unwrap();

        assert_eq!(rows[0].get("name"), Some(&Value::text("Human Resources")));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let source = CsvTableSource::new(dir.path());

        let err = source.load_table("ghost").await.unwrap_err();
        assert!(matches!(err, TableError::NotFound(ref t) if t == "ghost"));
    }

    #[tokio::test]
    async fn test_path_escape_rejected() {
        let dir = TempDir::new().unwrap();
        let source = CsvTableSource::new(dir.path());

        for name in ["../etc/passwd", "a/b", ""] {
            let err = source.load_table(name).await.unwrap_err();
            assert!(matches!(err, TableError::NotFound(_)));
        }
    }

    #[tokio::test]
    async fn test_ragged_rows_are_csv_errors() {
        let dir = TempDir::new().unwrap();
        write_table(&dir, "bad.csv", "a,b\n1,2,3\n");

        let source = CsvTableSource::new(dir.path());
        let err = source.load_table("bad").await.unwrap_err();
        assert_eq!(err.code(), "FLATSQL_TABLE_CSV");
    }
}
