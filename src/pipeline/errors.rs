//! Aggregation evaluation error types
//!
//! Error codes:
//! - SHELF_EVAL_DIVIDE_BY_ZERO (REJECT)
//! - SHELF_EVAL_TYPE_MISMATCH (REJECT)

use std::fmt;

/// Severity levels for evaluation errors
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

/// Evaluation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationErrorCode {
    /// Division by a value evaluating to zero
    DivideByZero,
    /// Operand type incompatible with the operator
    TypeMismatch,
}

impl EvaluationErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            EvaluationErrorCode::DivideByZero => "SHELF_EVAL_DIVIDE_BY_ZERO",
            EvaluationErrorCode::TypeMismatch => "SHELF_EVAL_TYPE_MISMATCH",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for EvaluationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An expression could not produce a definite value. The whole pipeline
/// fails; there are no partial or NaN results.
#[derive(Debug, Clone)]
pub struct EvaluationError {
    code: EvaluationErrorCode,
    message: String,
}

impl EvaluationError {
    /// Create a division-by-zero error
    pub fn divide_by_zero(context: impl Into<String>) -> Self {
        Self {
            code: EvaluationErrorCode::DivideByZero,
            message: format!("Division by zero in {}", context.into()),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(reason: impl Into<String>) -> Self {
        Self {
            code: EvaluationErrorCode::TypeMismatch,
            message: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> EvaluationErrorCode {
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
}

impl fmt::Display for EvaluationError {
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

impl std::error::Error for EvaluationError {}

/// Result type for expression and pipeline evaluation
pub type EvalResult<T> = Result<T, EvaluationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EvaluationErrorCode::DivideByZero.code(),
            "SHELF_EVAL_DIVIDE_BY_ZERO"
        );
        assert_eq!(
            EvaluationErrorCode::TypeMismatch.code(),
            "SHELF_EVAL_TYPE_MISMATCH"
        );
    }

    #[test]
    fn test_error_display() {
        let err = EvaluationError::divide_by_zero("$divide");
        let display = format!("{}", err);
        assert!(display.contains("SHELF_EVAL_DIVIDE_BY_ZERO"));
        assert!(display.contains("$divide"));
        assert!(display.contains("REJECT"));
    }
}
