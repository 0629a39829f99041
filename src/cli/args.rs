//! CLI argument definitions using clap
//!
//! Commands:
//! - flatsql query [--config <path>] [--data-dir <dir>] "<sql>"
//! - flatsql explain "<sql>"

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// flatsql - SQL queries over a directory of CSV files
#[derive(Parser, Debug)]
#[command(name = "flatsql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a single query and print the rows as JSON
    Query {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Table directory; overrides `data_dir` from the config file
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Query text
        sql: String,
    },

    /// Describe how a query would run, without reading any table
    Explain {
        /// Query text
        sql: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
