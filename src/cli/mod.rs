//! CLI module for flatsql
//!
//! Provides command-line interface for:
//! - query: One-shot query execution over a table directory
//! - explain: One-shot explain, no tables read

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, query, resolve_config, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response, write_text};
