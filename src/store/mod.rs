//! Document store boundary for shelfdb
//!
//! The engine evaluates queries over snapshots supplied by a store; it
//! never persists anything itself. `DocumentStore` is the collaborator
//! seam, and `MemoryStore` is the in-process reference implementation the
//! CLI drives.
//!
//! # Invariants
//!
//! - The store owns identity: `_id` is assigned at insert and never changes
//! - Natural order is the store's insertion order; the engine invents no
//!   ordering guarantees of its own

mod memory;
mod seed;

pub use memory::MemoryStore;
pub use seed::seed_documents;

use crate::advisor::IndexDefinition;
use crate::document::Document;
use crate::query::Predicate;

/// Outcome of an update: documents matched by the filter vs. documents a
/// setter actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: usize,
    pub modified: usize,
}

/// Collaborator seam to a document store.
pub trait DocumentStore {
    /// Full snapshot for scan-based evaluation, in natural order.
    fn fetch_all(&self) -> Vec<Document>;

    /// Currently declared indexes, in declaration order.
    fn fetch_indexes(&self) -> Vec<IndexDefinition>;

    /// Inserts documents, assigning `_id` where absent. Returns the number
    /// inserted.
    fn insert(&mut self, documents: Vec<Document>) -> usize;

    /// Deletes every document matching the predicates. Returns the number
    /// deleted.
    fn delete_where(&mut self, predicates: &[Predicate]) -> usize;

    /// Sets fields on every document matching the predicates. Setters on
    /// `_id` are ignored.
    fn update_where(&mut self, predicates: &[Predicate], setters: &Document) -> UpdateOutcome;
}
