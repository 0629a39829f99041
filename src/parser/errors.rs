//! Parser error types
//!
//! Error codes:
//! - FLATSQL_MALFORMED_QUERY (REJECT)
//! - FLATSQL_UNSUPPORTED_JOIN_TYPE (REJECT)
//! - FLATSQL_INVALID_OPERATOR (REJECT)

use std::fmt;

/// Severity levels for parser errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query rejected before any table is read
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Parser error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErrorCode {
    /// A clause does not have its expected textual shape
    MalformedQuery,
    /// Join keyword other than INNER, LEFT or RIGHT
    UnsupportedJoinType,
    /// WHERE operator outside the six comparisons
    InvalidOperator,
}

impl ParserErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ParserErrorCode::MalformedQuery => "FLATSQL_MALFORMED_QUERY",
            ParserErrorCode::UnsupportedJoinType => "FLATSQL_UNSUPPORTED_JOIN_TYPE",
            ParserErrorCode::InvalidOperator => "FLATSQL_INVALID_OPERATOR",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for ParserErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parser error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserError {
    code: ParserErrorCode,
    message: String,
}

impl ParserError {
    /// Create a malformed query error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            code: ParserErrorCode::MalformedQuery,
            message: reason.into(),
        }
    }

    /// Create an unsupported join type error
    pub fn unsupported_join_type(token: impl Into<String>) -> Self {
        Self {
            code: ParserErrorCode::UnsupportedJoinType,
            message: format!("Unsupported JOIN type: '{}'", token.into()),
        }
    }

    /// Create an invalid operator error
    pub fn invalid_operator(symbol: impl Into<String>) -> Self {
        Self {
            code: ParserErrorCode::InvalidOperator,
            message: format!("Invalid operator: '{}'", symbol.into()),
        }
    }

    pub fn code(&self) -> ParserErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ParserError {}

/// Result type for parser operations
pub type ParserResult<T> = Result<T, ParserError>;
