//! Engine error types
//!
//! Every error aborts the whole query call. Parse errors are raised before
//! any table is read; table errors are carried unchanged from the source.

use thiserror::Error;

use crate::parser::ParserError;
use crate::table::TableError;

/// Errors returned by [`QueryEngine`](super::QueryEngine)
#[derive(Debug, Error)]
pub enum EngineError {
    /// Query text rejected by the parser
    #[error(transparent)]
    Parse(#[from] ParserError),

    /// Failure reported by the table source
    #[error(transparent)]
    Table(#[from] TableError),
}

impl EngineError {
    /// Returns the stable string code of the underlying error
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Parse(e) => e.code().code(),
            EngineError::Table(e) => e.code(),
        }
    }

    /// Returns true if the query was rejected without reading any table
    pub fn is_rejection(&self) -> bool {
        matches!(self, EngineError::Parse(_))
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_rejection() {
        let err: EngineError = ParserError::malformed("bad").into();
        assert!(err.is_rejection());
        assert_eq!(err.code(), "FLATSQL_MALFORMED_QUERY");
    }

    #[test]
    fn test_table_error_passes_through() {
        let err: EngineError = TableError::NotFound("student".into()).into();
        assert!(!err.is_rejection());
        assert_eq!(err.code(), "FLATSQL_TABLE_NOT_FOUND");
        assert_eq!(err.to_string(), "Table not found: student");
    }
}
