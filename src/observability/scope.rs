//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` with `elapsed_ms` on success
//! - Logs `{name}_REJECTED` or `{name}_FAILED` on error
//! - Logs `{name}_INCOMPLETE` if dropped without an outcome

use std::cell::Cell;
use std::time::Instant;

use super::logger::{Logger, Severity};

/// A scope that automatically logs start and outcome events
///
/// # Usage
///
/// ```ignore
/// let scope = ObservationScope::with_fields("QUERY", &[("query", sql)]);
/// // ... do work ...
/// scope.complete_with_fields(&[("rows", "3")]); // logs QUERY_COMPLETE
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    /// Create a new observation scope
    ///
    /// Logs `{name}_BEGIN` at INFO level.
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a new observation scope with fields repeated on every record
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        let event = format!("{}_BEGIN", name);
        Logger::info(&event, fields);

        Self {
            name,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        }
    }

    fn emit(&self, severity: Severity, suffix: &str, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let event = format!("{}_{}", self.name, suffix);
        let elapsed = self.timer.elapsed_ms();

        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.extend(extra_fields.iter().copied());
        all_fields.push(("elapsed_ms", elapsed.as_str()));

        Logger::log(severity, &event, &all_fields);
    }

    /// Mark the scope as successfully completed
    pub fn complete(self) {
        self.emit(Severity::Info, "COMPLETE", &[]);
    }

    /// Mark the scope as successfully completed with additional fields
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.emit(Severity::Info, "COMPLETE", extra_fields);
    }

    /// Mark the scope as rejected before any work was done
    ///
    /// Logs `{name}_REJECTED` at WARN level.
    pub fn reject(self, code: &str, reason: &str) {
        self.emit(Severity::Warn, "REJECTED", &[("code", code), ("reason", reason)]);
    }

    /// Mark the scope as failed
    ///
    /// Logs `{name}_FAILED` at ERROR level.
    pub fn fail(self, code: &str, reason: &str) {
        self.emit(Severity::Error, "FAILED", &[("code", code), ("reason", reason)]);
    }

    /// Check if the scope has been completed
    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            let event = format!("{}_INCOMPLETE", self.name);
            Logger::warn(&event, &[("reason", "scope dropped without completion")]);
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_creation() {
        let scope = ObservationScope::new("TEST");
        assert!(!scope.is_completed());
        scope.complete();
    }

    #[test]
    fn test_scope_with_fields() {
        let scope = ObservationScope::with_fields("TEST", &[("query", "SELECT a FROM t")]);
        scope.complete_with_fields(&[("rows", "0")]);
    }

    #[test]
    fn test_scope_reject_and_fail() {
        let scope = ObservationScope::new("TEST");
        scope.reject("FLATSQL_MALFORMED_QUERY", "missing FROM");

        let scope = ObservationScope::new("TEST");
        scope.fail("FLATSQL_TABLE_NOT_FOUND", "table not found: t");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("TEST");
        drop(scope);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let ms: u64 = timer.elapsed_ms().parse().unwrap();
        assert!(ms >= 10);
    }
}
