//! Access-path selection
//!
//! Chooses between a full scan and the best-matching declared index for a
//! query shape, and models the cost of the chosen path over a snapshot.
//!
//! Selection is deterministic: same query + same index declarations → same
//! plan. Ties between equally-scored indexes go to the first declared.

use crate::document::Document;
use crate::executor::PredicateFilter;
use crate::query::{Predicate, QuerySpec};

use super::errors::{AdvisorResult, UnknownIndexError};
use super::index::IndexDefinition;

/// Access-path hint supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Hint {
    /// Let the advisor pick
    #[default]
    Auto,
    /// Force a full scan (`$natural`)
    Natural,
    /// Force a named index; unknown names are an error
    Index(String),
}

/// The access path a query would take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPath {
    /// Every document in the store is examined
    FullScan,
    /// Only documents reachable through the named index are examined
    IndexScan(String),
}

impl AccessPath {
    /// Renders the path (`full-scan` / `index-scan(name)`)
    pub fn describe(&self) -> String {
        match self {
            AccessPath::FullScan => "full-scan".to_string(),
            AccessPath::IndexScan(name) => format!("index-scan({})", name),
        }
    }

    pub fn is_index_scan(&self) -> bool {
        matches!(self, AccessPath::IndexScan(_))
    }
}

/// A chosen access path plus the index prefix fields that bound it.
/// The bound fields drive the examined-count simulation.
#[derive(Debug, Clone)]
pub struct PlannedAccess {
    pub access_path: AccessPath,
    pub bound_fields: Vec<String>,
}

/// Plan statistics for one query over one snapshot.
///
/// `docs_examined` is the modeled cost of the access path; `docs_returned`
/// counts actual result rows. `elapsed_ms` is a placeholder stamped by the
/// calling collaborator; the core itself never measures time.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub access_path: AccessPath,
    pub docs_examined: usize,
    pub docs_returned: usize,
    pub elapsed_ms: Option<u64>,
}

/// Chooses and costs access paths for queries
pub struct IndexAdvisor;

impl IndexAdvisor {
    /// Selects the access path for a query.
    ///
    /// With `Hint::Auto`, each declared index is scored by the compound
    /// prefix rule; the highest-scoring usable index wins and ties go to
    /// declaration order. No usable index means a full scan.
    pub fn choose_plan(
        query: &QuerySpec,
        indexes: &[IndexDefinition],
        hint: &Hint,
    ) -> AdvisorResult<PlannedAccess> {
        match hint {
            Hint::Natural => Ok(PlannedAccess {
                access_path: AccessPath::FullScan,
                bound_fields: Vec::new(),
            }),
            Hint::Index(name) => {
                let index = indexes
                    .iter()
                    .find(|ix| ix.name == *name)
                    .ok_or_else(|| UnknownIndexError::new(name.clone()))?;
                Ok(PlannedAccess {
                    access_path: AccessPath::IndexScan(index.name.clone()),
                    bound_fields: index.bound_prefix(&query.predicates),
                })
            }
            Hint::Auto => {
                let mut best: Option<(usize, &IndexDefinition)> = None;
                for index in indexes {
                    let score = index.prefix_score(&query.predicates);
                    if score == 0 {
                        continue;
                    }
                    // Strictly-greater keeps the first declared index on
                    // ties.
                    if best.map_or(true, |(best_score, _)| score > best_score) {
                        best = Some((score, index));
                    }
                }

                match best {
                    Some((_, index)) => Ok(PlannedAccess {
                        access_path: AccessPath::IndexScan(index.name.clone()),
                        bound_fields: index.bound_prefix(&query.predicates),
                    }),
                    None => Ok(PlannedAccess {
                        access_path: AccessPath::FullScan,
                        bound_fields: Vec::new(),
                    }),
                }
            }
        }
    }

    /// Models how many documents the chosen path would examine.
    ///
    /// A full scan examines the whole snapshot. An index scan examines only
    /// the documents whose values on the bound prefix fields satisfy the
    /// equality/range bounds; in a real deployment the store's index does
    /// this narrowing, so advisory mode simulates it by scanning while still
    /// reporting the index access path.
    pub fn count_examined(
        plan: &PlannedAccess,
        documents: &[Document],
        predicates: &[Predicate],
    ) -> usize {
        match &plan.access_path {
            AccessPath::FullScan => documents.len(),
            AccessPath::IndexScan(_) => {
                if plan.bound_fields.is_empty() {
                    // A forced index that binds nothing still walks every
                    // entry.
                    return documents.len();
                }
                let bound: Vec<Predicate> = predicates
                    .iter()
                    .filter(|p| plan.bound_fields.contains(&p.field))
                    .cloned()
                    .collect();
                documents
                    .iter()
                    .filter(|doc| PredicateFilter::matches(doc, &bound))
                    .count()
            }
        }
    }

    /// Plans a query and fills in plan statistics over a snapshot, without
    /// materializing results. `docs_returned` counts full predicate matches.
    pub fn simulate(
        query: &QuerySpec,
        indexes: &[IndexDefinition],
        hint: &Hint,
        documents: &[Document],
    ) -> AdvisorResult<ExecutionPlan> {
        let plan = Self::choose_plan(query, indexes, hint)?;
        let docs_examined = Self::count_examined(&plan, documents, &query.predicates);
        let docs_returned = documents
            .iter()
            .filter(|doc| PredicateFilter::matches(doc, &query.predicates))
            .count();

        Ok(ExecutionPlan {
            access_path: plan.access_path,
            docs_examined,
            docs_returned,
            elapsed_ms: None,
        })
    }
}
