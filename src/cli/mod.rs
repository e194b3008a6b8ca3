//! CLI subsystem for shelfdb
//!
//! Thin collaborator surface over the engine: argument parsing, a JSON data
//! file, JSON responses on stdout, structured logs on stderr. Exit code is
//! zero on success and non-zero on any rejection.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, IndexAction};
pub use commands::{dispatch, DataFile};
pub use errors::{CliError, CliResult};
pub use io::{write_error, write_response};

use crate::observability::Logger;

/// Parses arguments, runs the command, and reports failures on stdout
/// before returning them to the caller for the non-zero exit.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match commands::dispatch(cli) {
        Ok(()) => Ok(()),
        Err(err) => {
            Logger::error("COMMAND_FAILED", &[("code", err.code())]);
            let _ = io::write_error(err.code(), &err.to_string());
            Err(err)
        }
    }
}
