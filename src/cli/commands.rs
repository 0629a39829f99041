//! CLI command implementations

use std::path::Path;

use crate::config::Config;
use crate::executor::{explain as explain_query, QueryEngine};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response, write_text};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query {
            config,
            data_dir,
            sql,
        } => query(config.as_deref(), data_dir.as_deref(), &sql),
        Command::Explain { sql } => explain(&sql),
    }
}

/// Builds the effective configuration.
///
/// `--data-dir` overrides the file's `data_dir`; with no file it yields the
/// default configuration over that directory.
pub fn resolve_config(config_path: Option<&Path>, data_dir: Option<&Path>) -> CliResult<Config> {
    let mut config = match (config_path, data_dir) {
        (Some(path), _) => Config::load(path)?,
        (None, Some(dir)) => Config::with_data_dir(dir),
        (None, None) => return Err(CliError::missing_data_dir()),
    };

    if let Some(dir) = data_dir {
        config.data_dir = dir.to_path_buf();
    }
    config.validate()?;

    Ok(config)
}

/// Execute a single query and exit
///
/// Writes `{"status":"ok","data":[...]}` on success. On failure writes
/// `{"status":"error",...}` and returns an error so the process exits
/// non-zero.
pub fn query(config_path: Option<&Path>, data_dir: Option<&Path>, sql: &str) -> CliResult<()> {
    let config = resolve_config(config_path, data_dir)?;
    config.apply_log_level()?;
    let source = config.table_source()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;

    let engine = QueryEngine::new(&source);
    match runtime.block_on(engine.execute(sql)) {
        Ok(result) => write_response(&result.into_rows()),
        Err(err) => {
            write_error(err.code(), &err.to_string())?;
            Err(CliError::query_failed(err.code()))
        }
    }
}

/// Print the explain plan of a query and exit
///
/// No configuration is read and no table is touched.
pub fn explain(sql: &str) -> CliResult<()> {
    let plan = explain_query(sql);
    write_text(&plan.to_string())
}
