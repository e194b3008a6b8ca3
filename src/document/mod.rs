//! Document model for shelfdb
//!
//! A document is a schema-less, insertion-ordered JSON object. The `_id`
//! field is the opaque identity assigned by the document store; everything
//! else is caller data. "Field absent" (a lookup returning `None`) is
//! distinct from "field is null" throughout the engine.

use serde_json::{Map, Value};

/// A single document: an ordered mapping from field name to JSON value.
pub type Document = Map<String, Value>;

/// Reserved identity field, owned by the document store.
pub const ID_FIELD: &str = "_id";

/// Returns the document id, if one has been assigned.
pub fn doc_id(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

/// Resolves a dot-separated field path against a document.
///
/// Numeric path segments index into arrays.
pub fn get_path<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    match path.split_once('.') {
        None => document.get(path),
        Some((head, rest)) => document.get(head).and_then(|v| get_value_path(v, rest)),
    }
}

fn get_value_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let (head, rest) = match path.split_once('.') {
        None => (path, None),
        Some((h, r)) => (h, Some(r)),
    };

    let next = match value {
        Value::Object(map) => map.get(head),
        Value::Array(items) => head.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }?;

    match rest {
        None => Some(next),
        Some(r) => get_value_path(next, r),
    }
}
