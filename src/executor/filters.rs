//! Predicate filtering for query execution
//!
//! Evaluates predicates strictly against documents. Evaluation is pure: it
//! never mutates the document and is deterministic for identical inputs.

use std::cmp::Ordering;

use serde_json::Value;

use crate::document::{get_path, Document};
use crate::query::{FilterOp, Predicate};

/// Evaluates predicates against documents
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a document matches all predicates.
    ///
    /// AND semantics, short-circuiting left to right.
    pub fn matches(document: &Document, predicates: &[Predicate]) -> bool {
        predicates
            .iter()
            .all(|pred| Self::matches_predicate(document, pred))
    }

    /// Checks if a document matches a single predicate
    fn matches_predicate(document: &Document, predicate: &Predicate) -> bool {
        let actual = match get_path(document, &predicate.field) {
            Some(v) => v,
            // Absent fields match no operator, equality included.
            None => return false,
        };

        match &predicate.op {
            // Deep structural equality; an explicit null matches an
            // explicit stored null.
            FilterOp::Eq(expected) => actual == expected,
            FilterOp::Gt(bound) => Self::order(actual, bound) == Some(Ordering::Greater),
            FilterOp::Gte(bound) => matches!(
                Self::order(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::Lt(bound) => Self::order(actual, bound) == Some(Ordering::Less),
            FilterOp::Lte(bound) => matches!(
                Self::order(actual, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }

    /// Type-aware ordering: numbers compare numerically, strings by code
    /// point. Incompatible types do not order, so range operators simply
    /// fail to match (never an error).
    fn order(actual: &Value, bound: &Value) -> Option<Ordering> {
        match (actual, bound) {
            (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}
