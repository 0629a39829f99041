//! JSON output for the CLI
//!
//! - One JSON object per command on stdout
//! - UTF-8 only
//! - Logs go to stderr and never mix with this output

use std::io::{self, Write};

use serde::Serialize;
use serde_json::json;

use super::errors::CliResult;

/// Write a success response
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    write_value(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_value(&json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

/// Write plain text followed by a newline
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;

    Ok(())
}

fn write_value(value: &serde_json::Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
