//! Query error types
//!
//! Error codes:
//! - SHELF_QUERY_INVALID_OPERATOR (REJECT)
//! - SHELF_QUERY_INVALID_FILTER (REJECT)
//! - SHELF_QUERY_INVALID_PIPELINE (REJECT)

use std::fmt;

/// Severity levels for query errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Query error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidQueryErrorCode {
    /// Unknown operator key in a filter, expression or pipeline stage
    InvalidOperator,
    /// Malformed filter document
    InvalidFilter,
    /// Malformed aggregation pipeline
    InvalidPipeline,
}

impl InvalidQueryErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            InvalidQueryErrorCode::InvalidOperator => "SHELF_QUERY_INVALID_OPERATOR",
            InvalidQueryErrorCode::InvalidFilter => "SHELF_QUERY_INVALID_FILTER",
            InvalidQueryErrorCode::InvalidPipeline => "SHELF_QUERY_INVALID_PIPELINE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for InvalidQueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Malformed query input. Always rejected before evaluation; a malformed
/// filter can never silently match everything.
#[derive(Debug, Clone)]
pub struct InvalidQueryError {
    code: InvalidQueryErrorCode,
    message: String,
    key: Option<String>,
}

impl InvalidQueryError {
    /// Create an unknown operator error naming the offending key
    pub fn invalid_operator(key: impl Into<String>) -> Self {
        let k = key.into();
        Self {
            code: InvalidQueryErrorCode::InvalidOperator,
            message: format!("Unknown operator '{}'", k),
            key: Some(k),
        }
    }

    /// Create a malformed filter error
    pub fn invalid_filter(reason: impl Into<String>) -> Self {
        Self {
            code: InvalidQueryErrorCode::InvalidFilter,
            message: reason.into(),
            key: None,
        }
    }

    /// Create a malformed pipeline error
    pub fn invalid_pipeline(reason: impl Into<String>) -> Self {
        Self {
            code: InvalidQueryErrorCode::InvalidPipeline,
            message: reason.into(),
            key: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> InvalidQueryErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending operator key, if applicable
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

impl fmt::Display for InvalidQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for InvalidQueryError {}

/// Result type for query parsing
pub type QueryResult<T> = Result<T, InvalidQueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            InvalidQueryErrorCode::InvalidOperator.code(),
            "SHELF_QUERY_INVALID_OPERATOR"
        );
        assert_eq!(
            InvalidQueryErrorCode::InvalidFilter.code(),
            "SHELF_QUERY_INVALID_FILTER"
        );
        assert_eq!(
            InvalidQueryErrorCode::InvalidPipeline.code(),
            "SHELF_QUERY_INVALID_PIPELINE"
        );
    }

    #[test]
    fn test_operator_error_names_key() {
        let err = InvalidQueryError::invalid_operator("$regex");
        assert_eq!(err.key(), Some("$regex"));

        let display = format!("{}", err);
        assert!(display.contains("SHELF_QUERY_INVALID_OPERATOR"));
        assert!(display.contains("$regex"));
        assert!(display.contains("REJECT"));
    }
}
