//! CLI error type
//!
//! Wraps the engine's rejection errors plus the CLI's own I/O and argument
//! failures. Every variant maps to a non-zero exit and a stable code.

use thiserror::Error;

use crate::advisor::UnknownIndexError;
use crate::pipeline::EvaluationError;
use crate::query::InvalidQueryError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed filter, projection, sort or pipeline
    #[error("{0}")]
    Query(#[from] InvalidQueryError),

    /// Expression evaluation failed
    #[error("{0}")]
    Evaluation(#[from] EvaluationError),

    /// Unknown index referenced
    #[error("{0}")]
    UnknownIndex(#[from] UnknownIndexError),

    /// Argument is not valid JSON
    #[error("[REJECT] SHELF_CLI_BAD_JSON: {0}")]
    BadJson(#[from] serde_json::Error),

    /// Data file could not be read or written
    #[error("[ERROR] SHELF_CLI_DATA_ERROR: {0}")]
    Data(String),

    /// I/O failure on stdout/stderr
    #[error("[ERROR] SHELF_CLI_IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Data file error
    pub fn data_error(msg: impl Into<String>) -> Self {
        CliError::Data(msg.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Query(e) => e.code().code(),
            CliError::Evaluation(e) => e.code().code(),
            CliError::UnknownIndex(e) => e.code(),
            CliError::BadJson(_) => "SHELF_CLI_BAD_JSON",
            CliError::Data(_) => "SHELF_CLI_DATA_ERROR",
            CliError::Io(_) => "SHELF_CLI_IO_ERROR",
        }
    }
}
