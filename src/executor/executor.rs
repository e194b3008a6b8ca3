//! Query executor for shelfdb
//!
//! Runs a query shape against a snapshot, producing deterministic results.
//!
//! Execution flow (strict order):
//! 1. Consult the index advisor for the access path
//! 2. Model the examined-document count for that path
//! 3. Filter the snapshot strictly according to predicates
//! 4. Apply sort (if specified)
//! 5. Apply pagination window
//! 6. Apply projection (if specified)
//! 7. Return ordered results with plan statistics

use crate::advisor::{ExecutionPlan, Hint, IndexAdvisor, IndexDefinition};
use crate::document::Document;
use crate::query::QuerySpec;

use super::filters::PredicateFilter;
use super::paginate::paginate;
use super::project::Projector;
use super::result::ResultSet;
use super::sorter::ResultSorter;

/// Executes query shapes against document snapshots
pub struct QueryExecutor;

impl QueryExecutor {
    /// Executes a query and returns shaped results plus plan statistics.
    ///
    /// This method is deterministic: same snapshot + same query → same
    /// results. The snapshot is read-only for the duration of the call.
    pub fn execute(
        documents: &[Document],
        indexes: &[IndexDefinition],
        query: &QuerySpec,
        hint: &Hint,
    ) -> Result<ResultSet, crate::advisor::UnknownIndexError> {
        // Step 1-2: access path and modeled cost
        let access = IndexAdvisor::choose_plan(query, indexes, hint)?;
        let docs_examined = IndexAdvisor::count_examined(&access, documents, &query.predicates);

        // Step 3: filter
        let mut matched: Vec<Document> = documents
            .iter()
            .filter(|doc| PredicateFilter::matches(doc, &query.predicates))
            .cloned()
            .collect();

        // Step 4: sort
        if let Some(sort) = &query.sort {
            ResultSorter::sort(&mut matched, sort);
        }

        // Step 5: paginate
        let mut shaped = paginate(matched, &query.page);

        // Step 6: project
        if let Some(projection) = &query.projection {
            shaped = shaped
                .iter()
                .map(|doc| Projector::apply(doc, projection))
                .collect();
        }

        // Step 7: results + statistics
        let plan = ExecutionPlan {
            access_path: access.access_path,
            docs_examined,
            docs_returned: shaped.len(),
            elapsed_ms: None,
        };

        Ok(ResultSet {
            documents: shaped,
            plan,
        })
    }
}
