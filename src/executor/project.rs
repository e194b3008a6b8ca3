//! Field projection for query results
//!
//! Shapes documents after filtering: include mode keeps only the listed
//! fields, exclude mode drops them. `_id` rides along by default and is
//! only removed when a projection excludes it explicitly.

use serde_json::Value;

use crate::document::{get_path, Document, ID_FIELD};
use crate::query::{Projection, ProjectionMode};

/// Applies projections to documents
pub struct Projector;

impl Projector {
    /// Produces the projected form of a document.
    pub fn apply(document: &Document, projection: &Projection) -> Document {
        match projection.mode {
            ProjectionMode::Include => {
                let mut out = Document::new();
                if projection.include_id {
                    if let Some(id) = document.get(ID_FIELD) {
                        out.insert(ID_FIELD.to_string(), id.clone());
                    }
                }
                for field in &projection.fields {
                    Self::copy_field(document, field, &mut out);
                }
                out
            }
            ProjectionMode::Exclude => {
                let mut out = document.clone();
                for field in &projection.fields {
                    Self::drop_field(&mut out, field);
                }
                if !projection.include_id {
                    out.shift_remove(ID_FIELD);
                }
                out
            }
        }
    }

    fn copy_field(source: &Document, path: &str, out: &mut Document) {
        match path.split_once('.') {
            None => {
                if let Some(value) = source.get(path) {
                    out.insert(path.to_string(), value.clone());
                }
            }
            Some((head, rest)) => {
                // One level of nesting: "a.b" projects to {"a": {"b": ...}}.
                if let Some(value) = get_path(source, path) {
                    let entry = out
                        .entry(head.to_string())
                        .or_insert_with(|| Value::Object(Document::new()));
                    if let Value::Object(inner) = entry {
                        inner.insert(rest.to_string(), value.clone());
                    }
                }
            }
        }
    }

    fn drop_field(out: &mut Document, path: &str) {
        match path.split_once('.') {
            None => {
                out.shift_remove(path);
            }
            Some((head, rest)) => {
                if let Some(Value::Object(inner)) = out.get_mut(head) {
                    inner.shift_remove(rest);
                }
            }
        }
    }
}
