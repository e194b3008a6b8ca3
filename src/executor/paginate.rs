//! Pagination for query results
//!
//! Drops `skip` documents then takes up to `limit`. Out-of-range windows
//! produce empty or truncated results, never errors.

use crate::document::Document;
use crate::query::PageSpec;

/// Applies a pagination window to an ordered result sequence.
pub fn paginate(documents: Vec<Document>, page: &PageSpec) -> Vec<Document> {
    let iter = documents.into_iter().skip(page.skip);
    match page.limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}
