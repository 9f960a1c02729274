//! CLI module for the criteria engine
//!
//! Provides command-line interface for:
//! - fetch: page of matching documents from a JSON collection
//! - count: number of matching documents
//! - find-one: single document, filters required
//! - sql: fetch and count SQL for a configured table
//! - explain: translation plan for a criteria

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, CollectionArgs, Command};
pub use commands::{count, explain, fetch, find_one, run_command, sql};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_input, read_input, write_error, write_response};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CRITERIA_LOG";

/// Parse arguments, run the command, report failures as JSON
pub fn run() -> CliResult<()> {
    init_logging();

    let cli = Cli::parse_args();
    match run_command(cli.command) {
        Ok(()) => Ok(()),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Logs go to stderr so stdout carries only the JSON response
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
