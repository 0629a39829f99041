//! Observable events for flatsql
//!
//! Events are explicit and typed. Query lifecycle events (`QUERY_BEGIN`,
//! `QUERY_COMPLETE`, `QUERY_REJECTED`, `QUERY_FAILED`) come from
//! [`ObservationScope`](super::ObservationScope) instead.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Query lifecycle
    /// Query text parsed into a plan
    QueryParsed,

    // Pipeline stages
    /// Table rows loaded from the source
    TableLoaded,
    /// Join stage finished
    JoinComplete,
    /// WHERE stage finished
    FilterComplete,
    /// GROUP BY stage finished
    GroupComplete,

    // Explain
    /// Explain output produced
    ExplainComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::QueryParsed => "QUERY_PARSED",

            Event::TableLoaded => "TABLE_LOADED",
            Event::JoinComplete => "JOIN_COMPLETE",
            Event::FilterComplete => "FILTER_COMPLETE",
            Event::GroupComplete => "GROUP_COMPLETE",

            Event::ExplainComplete => "EXPLAIN_COMPLETE",
        }
    }

    /// Severity the event is logged at.
    ///
    /// Per-stage events are TRACE so a normal run stays quiet.
    pub fn severity(&self) -> Severity {
        match self {
            Event::TableLoaded
            | Event::JoinComplete
            | Event::FilterComplete
            | Event::GroupComplete => Severity::Trace,
            Event::ConfigLoaded | Event::QueryParsed | Event::ExplainComplete => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
