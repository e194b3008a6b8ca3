//! Explain output for access-path decisions
//!
//! Produces deterministic, human-readable explain output for an accepted
//! plan or a rejected request.

use std::fmt;

use crate::query::QuerySpec;

use super::advisor::ExecutionPlan;
use super::errors::UnknownIndexError;

/// Explain report for one query shape
#[derive(Debug, Clone)]
pub struct ExplainReport {
    /// Whether planning succeeded
    pub accepted: bool,
    /// Access path description (if accepted)
    pub access_path: Option<String>,
    /// Modeled documents examined (if accepted)
    pub docs_examined: Option<usize>,
    /// Actual matching rows (if accepted)
    pub docs_returned: Option<usize>,
    /// Elapsed-time placeholder, stamped by the caller
    pub elapsed_ms: Option<u64>,
    /// Rendered predicates
    pub predicates: Vec<String>,
    /// Rendered sort keys
    pub sort: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
}

impl ExplainReport {
    /// Builds a report from plan statistics
    pub fn from_plan(plan: &ExecutionPlan, query: &QuerySpec) -> Self {
        let predicates = query
            .predicates
            .iter()
            .map(|p| format!("{} {} {}", p.field, p.op.op_name(), p.op.value()))
            .collect();

        let sort = query.sort.as_ref().map(|spec| {
            spec.keys
                .iter()
                .map(|k| format!("{} {}", k.field, k.direction.as_str()))
                .collect::<Vec<_>>()
                .join(", ")
        });

        Self {
            accepted: true,
            access_path: Some(plan.access_path.describe()),
            docs_examined: Some(plan.docs_examined),
            docs_returned: Some(plan.docs_returned),
            elapsed_ms: plan.elapsed_ms,
            predicates,
            sort,
            rejection_code: None,
            rejection_reason: None,
        }
    }

    /// Builds a report from a planning rejection
    pub fn from_error(err: &UnknownIndexError) -> Self {
        Self {
            accepted: false,
            access_path: None,
            docs_examined: None,
            docs_returned: None,
            elapsed_ms: None,
            predicates: Vec::new(),
            sort: None,
            rejection_code: Some(err.code().to_string()),
            rejection_reason: Some(err.message().to_string()),
        }
    }
}

impl fmt::Display for ExplainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if let Some(path) = &self.access_path {
                writeln!(f, "Access Path: {}", path)?;
            }
            if !self.predicates.is_empty() {
                writeln!(f, "Predicates:")?;
                for pred in &self.predicates {
                    writeln!(f, "  - {}", pred)?;
                }
            }
            if let Some(sort) = &self.sort {
                writeln!(f, "Sort: {}", sort)?;
            }
            if let Some(examined) = self.docs_examined {
                writeln!(f, "Documents Examined: {}", examined)?;
            }
            if let Some(returned) = self.docs_returned {
                writeln!(f, "Documents Returned: {}", returned)?;
            }
            if let Some(elapsed) = self.elapsed_ms {
                writeln!(f, "Elapsed: {} ms", elapsed)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{Hint, IndexAdvisor, IndexDefinition};
    use crate::query::{Predicate, SortDirection, SortSpec};
    use serde_json::json;

    fn indexes() -> Vec<IndexDefinition> {
        vec![IndexDefinition::with_derived_name(vec![
            ("author".into(), SortDirection::Asc),
            ("published_year".into(), SortDirection::Asc),
        ])]
    }

    #[test]
    fn test_explain_accepted_plan() {
        let query = QuerySpec::new()
            .filter_eq("author", json!("Margaret Atwood"))
            .with_predicate(Predicate::gt("published_year", json!(1980)))
            .with_sort(SortSpec::new().asc("published_year"));

        let plan = IndexAdvisor::simulate(&query, &indexes(), &Hint::Auto, &[]).unwrap();
        let report = ExplainReport::from_plan(&plan, &query);

        assert!(report.accepted);
        assert_eq!(
            report.access_path.as_deref(),
            Some("index-scan(author_1_published_year_1)")
        );

        let output = format!("{}", report);
        assert!(output.contains("ACCEPTED"));
        assert!(output.contains("author eq \"Margaret Atwood\""));
        assert!(output.contains("published_year gt 1980"));
        assert!(output.contains("published_year asc"));
    }

    #[test]
    fn test_explain_rejected_plan() {
        let err = UnknownIndexError::new("isbn_1");
        let report = ExplainReport::from_error(&err);

        assert!(!report.accepted);
        assert_eq!(report.rejection_code.as_deref(), Some("SHELF_UNKNOWN_INDEX"));

        let output = format!("{}", report);
        assert!(output.contains("REJECTED"));
        assert!(output.contains("SHELF_UNKNOWN_INDEX"));
        assert!(output.contains("isbn_1"));
    }

    #[test]
    fn test_explain_deterministic() {
        let query = QuerySpec::new().filter_eq("author", json!("Margaret Atwood"));
        let plan = IndexAdvisor::simulate(&query, &indexes(), &Hint::Auto, &[]).unwrap();

        let first = format!("{}", ExplainReport::from_plan(&plan, &query));
        let second = format!("{}", ExplainReport::from_plan(&plan, &query));
        assert_eq!(first, second);
    }
}
