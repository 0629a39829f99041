//! Configuration for flatsql
//!
//! Loaded from a JSON file. Only `data_dir` is required:
//!
//! ```json
//! { "data_dir": "./tables", "extension": "csv", "delimiter": ",", "log_level": "warn" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::table::CsvTableSource;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one file per table (required)
    pub data_dir: PathBuf,

    /// Table file extension, without the dot (default "csv")
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Field delimiter, a single ASCII character (default ",")
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Minimum log severity (default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_extension() -> String {
    "csv".to_string()
}
fn default_delimiter() -> String {
    ",".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Default configuration over `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            extension: default_extension(),
            delimiter: default_delimiter(),
            log_level: default_log_level(),
        }
    }

    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        let data_dir = config.data_dir.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("data_dir", data_dir.as_str())]);

        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }

        if self.extension.is_empty() || self.extension.contains(['.', '/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "Invalid extension: '{}'",
                self.extension
            )));
        }

        self.delimiter_byte()?;
        self.log_severity()?;

        Ok(())
    }

    /// Delimiter as a byte
    pub fn delimiter_byte(&self) -> ConfigResult<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ConfigError::Invalid(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> ConfigResult<Severity> {
        Severity::from_name(&self.log_level).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            ))
        })
    }

    /// Applies `log_level` to the process-wide logger
    pub fn apply_log_level(&self) -> ConfigResult<()> {
        Logger::set_level(self.log_severity()?);
        Ok(())
    }

    /// Builds the CSV table source described by this configuration
    pub fn table_source(&self) -> ConfigResult<CsvTableSource> {
        Ok(CsvTableSource::new(self.data_dir.clone())
            .with_extension(self.extension.as_str())
            .with_delimiter(self.delimiter_byte()?))
    }
}
