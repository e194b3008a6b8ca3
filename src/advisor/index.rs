//! Index definitions and the compound-prefix usability rule
//!
//! An index covers a query only through a usable prefix of its key fields:
//! leading fields must be equality-bound, and at most one further field may
//! be range-bound. The prefix score counts those bound fields; score zero
//! means the index cannot serve the query at all.

use serde::{Deserialize, Serialize};

use crate::query::{Predicate, SortDirection};

/// A declared index: a name and an ordered compound key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Index name (unique within the store)
    pub name: String,
    /// Ordered (field, direction) pairs forming the compound key
    pub keys: Vec<(String, SortDirection)>,
}

impl IndexDefinition {
    /// Creates an index with an explicit name
    pub fn new(name: impl Into<String>, keys: Vec<(String, SortDirection)>) -> Self {
        Self {
            name: name.into(),
            keys,
        }
    }

    /// Creates an index named after its key, `field_1` / `field_1_other_-1`
    /// style.
    pub fn with_derived_name(keys: Vec<(String, SortDirection)>) -> Self {
        let name = keys
            .iter()
            .map(|(field, direction)| format!("{}_{}", field, direction.as_i64()))
            .collect::<Vec<_>>()
            .join("_");
        Self { name, keys }
    }

    /// Prefix-match score for a set of predicates: the number of leading
    /// key fields that are equality-bound, plus one if the next field is
    /// range-bound. Zero means unusable.
    pub fn prefix_score(&self, predicates: &[Predicate]) -> usize {
        self.walk_prefix(predicates).len()
    }

    /// The key fields consumed by the usable prefix, in key order.
    pub fn bound_prefix(&self, predicates: &[Predicate]) -> Vec<String> {
        self.walk_prefix(predicates)
    }

    fn walk_prefix(&self, predicates: &[Predicate]) -> Vec<String> {
        let mut bound = Vec::new();
        for (field, _) in &self.keys {
            let has_equality = predicates
                .iter()
                .any(|p| p.field == *field && p.is_equality());
            if has_equality {
                bound.push(field.clone());
                continue;
            }

            let has_range = predicates.iter().any(|p| p.field == *field && p.is_range());
            if has_range {
                // A range bound closes the prefix: later fields cannot be
                // used.
                bound.push(field.clone());
            }
            break;
        }
        bound
    }
}
