//! CLI-specific error types
//!
//! Query failures are reported on stdout as JSON and are not CLI errors.
//! A `CliError` means the command itself could not run.

use std::fmt;
use std::io;

use crate::config::ConfigError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, runtime)
    IoError,
    /// Neither --config nor --data-dir was given
    MissingDataDir,
    /// The query failed; its error was already written to stdout
    QueryFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FLATSQL_CLI_CONFIG_ERROR",
            Self::IoError => "FLATSQL_CLI_IO_ERROR",
            Self::MissingDataDir => "FLATSQL_CLI_MISSING_DATA_DIR",
            Self::QueryFailed => "FLATSQL_CLI_QUERY_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// No table directory given
    pub fn missing_data_dir() -> Self {
        Self::new(
            CliErrorCode::MissingDataDir,
            "No table directory. Pass --data-dir or --config.",
        )
    }

    /// Query failed after its error response was written
    pub fn query_failed(code: &str) -> Self {
        Self::new(CliErrorCode::QueryFailed, format!("Query failed with {}", code))
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
