//! Table source errors

use std::io;

use thiserror::Error;

/// Result type for table loading
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised while loading a table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table not found: {0}")]
    NotFound(String),

    #[error("I/O error reading table '{table}': {source}")]
    Io {
        table: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid CSV in table '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },
}

impl TableError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            TableError::NotFound(_) => "FLATSQL_TABLE_NOT_FOUND",
            TableError::Io { .. } => "FLATSQL_TABLE_IO",
            TableError::Csv { .. } => "FLATSQL_TABLE_CSV",
        }
    }

    /// Maps an I/O error, turning `NotFound` into [`TableError::NotFound`]
    pub fn from_io(table: &str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            TableError::NotFound(table.to_string())
        } else {
            TableError::Io {
                table: table.to_string(),
                source: err,
            }
        }
    }
}
