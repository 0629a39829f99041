//! Observability subsystem for flatsql
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed pipeline events
//! - Scope-based query lifecycle tracing
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No background threads
//!
//! # Usage
//!
//! ```ignore
//! use flatsql::observability::{Event, ObservationScope, log_event_with_fields};
//!
//! let scope = ObservationScope::with_fields("QUERY", &[("query", sql)]);
//! log_event_with_fields(Event::JoinComplete, &[("rows", "4")]);
//! scope.complete_with_fields(&[("rows", "4")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log a pipeline event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
