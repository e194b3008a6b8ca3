//! Result sorting for query execution
//!
//! Stable multi-key sort over documents. Documents missing a sort field
//! order before every document that has it, in ascending and descending
//! runs alike; direction only reverses comparisons between present values.

use std::cmp::Ordering;

use serde_json::Value;

use crate::document::{get_path, Document};
use crate::query::{SortDirection, SortSpec};

/// Sorts result documents
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts documents according to the sort specification.
    ///
    /// The sort is stable: documents with equal keys keep their input
    /// order, which is the store's natural order.
    pub fn sort(documents: &mut [Document], spec: &SortSpec) {
        documents.sort_by(|a, b| Self::compare(a, b, spec));
    }

    fn compare(a: &Document, b: &Document, spec: &SortSpec) -> Ordering {
        for key in &spec.keys {
            let a_val = get_path(a, &key.field);
            let b_val = get_path(b, &key.field);

            let ordering = match (a_val, b_val) {
                (None, None) => Ordering::Equal,
                // Absent sorts before present regardless of direction.
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(av), Some(bv)) => {
                    let ordering = Self::compare_values(av, bv);
                    match key.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                }
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Compares two JSON values for sorting.
    ///
    /// Ordering rules:
    /// - null < bool < number < string < array < object
    /// - For same types, natural ordering
    fn compare_values(a: &Value, b: &Value) -> Ordering {
        let type_order = |v: &Value| -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Number(_) => 2,
                Value::String(_) => 3,
                Value::Array(_) => 4,
                Value::Object(_) => 5,
            }
        };

        let a_type = type_order(a);
        let b_type = type_order(b);
        if a_type != b_type {
            return a_type.cmp(&b_type);
        }

        match (a, b) {
            (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
            (Value::Number(a_n), Value::Number(b_n)) => {
                let a_f = a_n.as_f64().unwrap_or(0.0);
                let b_f = b_n.as_f64().unwrap_or(0.0);
                a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
            }
            (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
            // Arrays and objects are not ordered among themselves.
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn titles(docs: &[Document]) -> Vec<&str> {
        docs.iter()
            .map(|d| d.get("_id").and_then(Value::as_str).unwrap_or(""))
            .collect()
    }

    #[test]
    fn test_sort_ascending() {
        let mut docs = vec![
            doc(json!({"_id": "c", "price": 15.99})),
            doc(json!({"_id": "a", "price": 9.99})),
            doc(json!({"_id": "b", "price": 12.75})),
        ];

        ResultSorter::sort(&mut docs, &SortSpec::new().asc("price"));
        assert_eq!(titles(&docs), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_descending() {
        let mut docs = vec![
            doc(json!({"_id": "c", "price": 15.99})),
            doc(json!({"_id": "a", "price": 9.99})),
            doc(json!({"_id": "b", "price": 12.75})),
        ];

        ResultSorter::sort(&mut docs, &SortSpec::new().desc("price"));
        assert_eq!(titles(&docs), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_stable_on_ties() {
        let mut docs = vec![
            doc(json!({"_id": "a", "genre": "Fantasy"})),
            doc(json!({"_id": "b", "genre": "Fantasy"})),
            doc(json!({"_id": "c", "genre": "Fantasy"})),
        ];

        ResultSorter::sort(&mut docs, &SortSpec::new().asc("genre"));
        assert_eq!(titles(&docs), vec!["a", "b", "c"]);

        ResultSorter::sort(&mut docs, &SortSpec::new().desc("genre"));
        assert_eq!(titles(&docs), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_field_first_in_both_directions() {
        let asc_input = vec![
            doc(json!({"_id": "a", "price": 9.99})),
            doc(json!({"_id": "m"})),
            doc(json!({"_id": "b", "price": 12.75})),
        ];

        let mut asc = asc_input.clone();
        ResultSorter::sort(&mut asc, &SortSpec::new().asc("price"));
        assert_eq!(titles(&asc), vec!["m", "a", "b"]);

        let mut desc = asc_input;
        ResultSorter::sort(&mut desc, &SortSpec::new().desc("price"));
        assert_eq!(titles(&desc), vec!["m", "b", "a"]);
    }

    #[test]
    fn test_multi_key_sort() {
        let mut docs = vec![
            doc(json!({"_id": "a", "genre": "Fantasy", "price": 16.50})),
            doc(json!({"_id": "b", "genre": "Fantasy", "price": 13.50})),
            doc(json!({"_id": "c", "genre": "Dystopian", "price": 11.99})),
        ];

        ResultSorter::sort(&mut docs, &SortSpec::new().asc("genre").asc("price"));
        assert_eq!(titles(&docs), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_null_sorts_before_values_but_after_missing() {
        let mut docs = vec![
            doc(json!({"_id": "v", "rank": 3})),
            doc(json!({"_id": "n", "rank": null})),
            doc(json!({"_id": "m"})),
        ];

        ResultSorter::sort(&mut docs, &SortSpec::new().asc("rank"));
        assert_eq!(titles(&docs), vec!["m", "n", "v"]);
    }

    #[test]
    fn test_mixed_types_rank_by_type() {
        let mut docs = vec![
            doc(json!({"_id": "s", "v": "text"})),
            doc(json!({"_id": "n", "v": 10})),
            doc(json!({"_id": "b", "v": true})),
        ];

        ResultSorter::sort(&mut docs, &SortSpec::new().asc("v"));
        assert_eq!(titles(&docs), vec!["b", "n", "s"]);
    }
}
