//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, no buffering
//! - Written to stderr so query output on stdout stays clean
//!
//! Records below the process-wide minimum severity are dropped.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-stage detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Rejected queries and recoverable issues
    Warn = 2,
    /// Failed calls
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Parses a level name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "trace" => Some(Severity::Trace),
            "info" => Some(Severity::Info),
            "warn" => Some(Severity::Warn),
            "error" => Some(Severity::Error),
            "fatal" => Some(Severity::Fatal),
            _ => None,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Warn as u8);

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Sets the minimum severity that is written
    pub fn set_level(level: Severity) {
        MIN_SEVERITY.store(level as u8, Ordering::Relaxed);
    }

    /// Returns the current minimum severity
    pub fn level() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Returns true if records of this severity are written
    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::level()
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        Self::log_to_writer(severity, event, fields, &mut io::stderr());
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let mut output = String::with_capacity(256);

        output.push('{');

        output.push_str("\"event\":\"");
        Self::escape_json_string(&mut output, event);
        output.push('"');

        output.push_str(",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            Self::escape_json_string(&mut output, key);
            output.push_str("\":\"");
            Self::escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push('}');
        output.push('\n');

        // one write per record
        let _ = writer.write_all(output.as_bytes());
        let _ = writer.flush();
    }

    fn escape_json_string(output: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => output.push_str("\\\""),
                '\\' => output.push_str("\\\\"),
                '\n' => output.push_str("\\n"),
                '\r' => output.push_str("\\r"),
                '\t' => output.push_str("\\t"),
                c if c.is_control() => {
                    output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => output.push(c),
            }
        }
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }
}

/// Capture a log record to a buffer for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_severity_from_name() {
        assert_eq!(Severity::from_name("TRACE"), Some(Severity::Trace));
        assert_eq!(Severity::from_name("warn"), Some(Severity::Warn));
        assert_eq!(Severity::from_name("verbose"), None);
    }

    #[test]
    fn test_log_json_format() {
        let output = capture_log(Severity::Info, "QUERY_BEGIN", &[]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "QUERY_BEGIN");
        assert_eq!(parsed["severity"], "INFO");
    }

    #[test]
    fn test_log_deterministic_ordering() {
        let output1 = capture_log(
            Severity::Info,
            "TEST",
            &[("table", "student"), ("rows", "2"), ("elapsed_ms", "0")],
        );
        let output2 = capture_log(
            Severity::Info,
            "TEST",
            &[("rows", "2"), ("elapsed_ms", "0"), ("table", "student")],
        );
        assert_eq!(output1, output2);

        let elapsed = output1.find("elapsed_ms").unwrap();
        let rows = output1.find("rows").unwrap();
        let table = output1.find("table").unwrap();
        assert!(elapsed < rows && rows < table);
    }

    #[test]
    fn test_log_escapes_special_chars() {
        let output = capture_log(
            Severity::Warn,
            "TEST",
            &[("query", "SELECT \"a\"\nFROM t")],
        );

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["query"], "SELECT \"a\"\nFROM t");
        assert_eq!(output.chars().filter(|c| *c == '\n').count(), 1);
    }

    #[test]
    fn test_default_level_filters_info() {
        // Default is WARN unless a caller raised or lowered it
        if Logger::level() == Severity::Warn {
            assert!(!Logger::enabled(Severity::Info));
            assert!(Logger::enabled(Severity::Error));
        }
    }
}
