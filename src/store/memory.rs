//! In-memory reference store
//!
//! Documents live in a plain vector (insertion order = natural order);
//! indexes are declarations only, consulted by the advisor rather than
//! materialized as trees.

use serde_json::Value;
use uuid::Uuid;

use crate::advisor::IndexDefinition;
use crate::document::{Document, ID_FIELD};
use crate::executor::PredicateFilter;
use crate::query::Predicate;

use super::{DocumentStore, UpdateOutcome};

/// In-memory document store with an index registry
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Vec<Document>,
    indexes: Vec<IndexDefinition>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store over existing documents and index declarations
    pub fn with_contents(documents: Vec<Document>, indexes: Vec<IndexDefinition>) -> Self {
        Self { documents, indexes }
    }

    /// Declares an index. Re-declaring a name replaces the old definition
    /// in place, keeping its declaration position.
    pub fn create_index(&mut self, index: IndexDefinition) {
        match self.indexes.iter_mut().find(|ix| ix.name == index.name) {
            Some(existing) => *existing = index,
            None => self.indexes.push(index),
        }
    }

    /// Drops every declared index
    pub fn drop_indexes(&mut self) {
        self.indexes.clear();
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn ensure_id(document: Document) -> Document {
        if document.contains_key(ID_FIELD) {
            return document;
        }
        let mut with_id = Document::new();
        with_id.insert(
            ID_FIELD.to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );
        for (key, value) in document {
            with_id.insert(key, value);
        }
        with_id
    }
}

impl DocumentStore for MemoryStore {
    fn fetch_all(&self) -> Vec<Document> {
        self.documents.clone()
    }

    fn fetch_indexes(&self) -> Vec<IndexDefinition> {
        self.indexes.clone()
    }

    fn insert(&mut self, documents: Vec<Document>) -> usize {
        let mut inserted = 0;
        for document in documents {
            self.documents.push(Self::ensure_id(document));
            inserted += 1;
        }
        inserted
    }

    fn delete_where(&mut self, predicates: &[Predicate]) -> usize {
        let before = self.documents.len();
        self.documents
            .retain(|doc| !PredicateFilter::matches(doc, predicates));
        before - self.documents.len()
    }

    fn update_where(&mut self, predicates: &[Predicate], setters: &Document) -> UpdateOutcome {
        let mut matched = 0;
        let mut modified = 0;

        for doc in self.documents.iter_mut() {
            if !PredicateFilter::matches(doc, predicates) {
                continue;
            }
            matched += 1;

            let mut changed = false;
            for (field, value) in setters {
                if field == ID_FIELD {
                    // Identity is immutable once assigned.
                    continue;
                }
                if doc.get(field) != Some(value) {
                    doc.insert(field.clone(), value.clone());
                    changed = true;
                }
            }
            if changed {
                modified += 1;
            }
        }

        UpdateOutcome { matched, modified }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::doc_id;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_insert_assigns_unique_ids() {
        let mut store = MemoryStore::new();
        let inserted = store.insert(vec![
            doc(json!({"title": "Dune"})),
            doc(json!({"title": "Circe"})),
        ]);
        assert_eq!(inserted, 2);

        let docs = store.fetch_all();
        let id0 = doc_id(&docs[0]).expect("id assigned").to_string();
        let id1 = doc_id(&docs[1]).expect("id assigned").to_string();
        assert_ne!(id0, id1);
        // The id leads the field order.
        assert_eq!(docs[0].keys().next().map(String::as_str), Some("_id"));
    }

    #[test]
    fn test_insert_keeps_caller_id() {
        let mut store = MemoryStore::new();
        store.insert(vec![doc(json!({"_id": "book_1", "title": "Dune"}))]);
        assert_eq!(doc_id(&store.fetch_all()[0]), Some("book_1"));
    }

    #[test]
    fn test_natural_order_is_insertion_order() {
        let mut store = MemoryStore::new();
        store.insert(vec![doc(json!({"_id": "a"}))]);
        store.insert(vec![doc(json!({"_id": "b"})), doc(json!({"_id": "c"}))]);

        let ids: Vec<String> = store
            .fetch_all()
            .iter()
            .map(|d| doc_id(d).unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_delete_where() {
        let mut store = MemoryStore::new();
        store.insert(vec![
            doc(json!({"_id": "a", "genre": "Fantasy"})),
            doc(json!({"_id": "b", "genre": "Fiction"})),
            doc(json!({"_id": "c", "genre": "Fantasy"})),
        ]);

        let deleted = store.delete_where(&[Predicate::eq("genre", json!("Fantasy"))]);
        assert_eq!(deleted, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(doc_id(&store.fetch_all()[0]), Some("b"));
    }

    #[test]
    fn test_update_where_counts_matched_and_modified() {
        let mut store = MemoryStore::new();
        store.insert(vec![
            doc(json!({"_id": "a", "title": "Dune", "price": 15.99})),
            doc(json!({"_id": "b", "title": "Dune", "price": 17.99})),
        ]);

        let setters = doc(json!({"price": 17.99}));
        let outcome = store.update_where(&[Predicate::eq("title", json!("Dune"))], &setters);
        // Both match; only the first actually changes.
        assert_eq!(outcome, UpdateOutcome { matched: 2, modified: 1 });
        assert_eq!(store.fetch_all()[0].get("price"), Some(&json!(17.99)));
    }

    #[test]
    fn test_update_ignores_id_setter() {
        let mut store = MemoryStore::new();
        store.insert(vec![doc(json!({"_id": "a", "title": "Dune"}))]);

        let setters = doc(json!({"_id": "z", "title": "Dune Messiah"}));
        let outcome = store.update_where(&[Predicate::eq("_id", json!("a"))], &setters);
        assert_eq!(outcome.modified, 1);

        let docs = store.fetch_all();
        assert_eq!(doc_id(&docs[0]), Some("a"));
        assert_eq!(docs[0].get("title"), Some(&json!("Dune Messiah")));
    }

    #[test]
    fn test_update_can_add_new_field() {
        let mut store = MemoryStore::new();
        store.insert(vec![doc(json!({"_id": "a", "title": "Dune"}))]);

        let outcome = store.update_where(
            &[Predicate::eq("_id", json!("a"))],
            &doc(json!({"in_stock": true})),
        );
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });
        assert_eq!(store.fetch_all()[0].get("in_stock"), Some(&json!(true)));
    }

    #[test]
    fn test_index_registry() {
        use crate::query::SortDirection;

        let mut store = MemoryStore::new();
        store.create_index(IndexDefinition::with_derived_name(vec![(
            "title".into(),
            SortDirection::Asc,
        )]));
        store.create_index(IndexDefinition::with_derived_name(vec![
            ("author".into(), SortDirection::Asc),
            ("published_year".into(), SortDirection::Asc),
        ]));
        assert_eq!(store.fetch_indexes().len(), 2);

        // Re-declaring a name replaces in place.
        store.create_index(IndexDefinition::new(
            "title_1",
            vec![("title".into(), SortDirection::Desc)],
        ));
        let indexes = store.fetch_indexes();
        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes[0].keys[0].1, SortDirection::Desc);

        store.drop_indexes();
        assert!(store.fetch_indexes().is_empty());
    }
}
