//! Aggregation pipeline subsystem for shelfdb
//!
//! An ordered list of stages (group, project, add-fields, sort, limit) run
//! over a document sequence by a small interpreter. Derived fields are
//! explicit expression trees; there is no dynamic dispatch on untyped
//! values and no partial output on failure.

mod engine;
mod errors;
mod expr;
mod stage;

pub use engine::PipelineEngine;
pub use errors::{EvalResult, EvaluationError, EvaluationErrorCode};
pub use expr::{parse_expr, Expr};
pub use stage::{
    Accumulator, AggregationStage, GroupStage, ProjectField, ProjectStage, parse_pipeline,
};
