//! Filter-document parsing
//!
//! Turns Mongo-style JSON filter, sort and projection documents into the
//! typed AST. Parsing is strict: any `$`-prefixed key that is not a known
//! operator is rejected with the offending key named, so a malformed filter
//! can never be evaluated (let alone match everything).

use serde_json::Value;

use super::ast::{Predicate, Projection, ProjectionMode, SortDirection, SortKey, SortSpec};
use super::errors::{InvalidQueryError, QueryResult};
use crate::document::ID_FIELD;

/// Parses a filter document into predicates.
///
/// Top-level fields combine with implicit AND, in document order. A field
/// value that is an object of `$`-operators contributes one predicate per
/// operator; any other value is an equality match (deep structural
/// equality, so nested documents and arrays compare wholesale).
pub fn parse_filter(filter: &Value) -> QueryResult<Vec<Predicate>> {
    let object = filter
        .as_object()
        .ok_or_else(|| InvalidQueryError::invalid_filter("filter must be a JSON object"))?;

    let mut predicates = Vec::new();
    for (field, spec) in object {
        if field.starts_with('$') {
            return Err(InvalidQueryError::invalid_operator(field.clone()));
        }
        parse_field(field, spec, &mut predicates)?;
    }
    Ok(predicates)
}

fn parse_field(field: &str, spec: &Value, out: &mut Vec<Predicate>) -> QueryResult<()> {
    let operators = match spec.as_object() {
        Some(map) if map.keys().any(|k| k.starts_with('$')) => map,
        // Plain values (including nested objects without operators) are
        // equality matches.
        _ => {
            out.push(Predicate::eq(field, spec.clone()));
            return Ok(());
        }
    };

    for (op, value) in operators {
        let predicate = match op.as_str() {
            "$gt" => Predicate::gt(field, value.clone()),
            "$gte" => Predicate::gte(field, value.clone()),
            "$lt" => Predicate::lt(field, value.clone()),
            "$lte" => Predicate::lte(field, value.clone()),
            "$eq" => Predicate::eq(field, value.clone()),
            key if key.starts_with('$') => {
                return Err(InvalidQueryError::invalid_operator(key.to_string()));
            }
            _ => {
                return Err(InvalidQueryError::invalid_filter(format!(
                    "field '{}' mixes operators with plain keys",
                    field
                )));
            }
        };
        out.push(predicate);
    }
    Ok(())
}

/// Parses a sort document (`{"price": 1, "title": -1}`) into a sort spec.
pub fn parse_sort(sort: &Value) -> QueryResult<SortSpec> {
    let object = sort
        .as_object()
        .ok_or_else(|| InvalidQueryError::invalid_filter("sort must be a JSON object"))?;

    let mut spec = SortSpec::new();
    for (field, direction) in object {
        spec.keys.push(SortKey {
            field: field.clone(),
            direction: parse_direction(field, direction)?,
        });
    }
    Ok(spec)
}

/// Parses a direction value (1 / -1) as used in sort documents and index
/// key specifications.
pub fn parse_direction(field: &str, value: &Value) -> QueryResult<SortDirection> {
    match value.as_i64() {
        Some(1) => Ok(SortDirection::Asc),
        Some(-1) => Ok(SortDirection::Desc),
        _ => Err(InvalidQueryError::invalid_filter(format!(
            "sort direction for '{}' must be 1 or -1",
            field
        ))),
    }
}

/// Parses a projection document (`{"_id": 0, "title": 1}`).
///
/// Include and exclude flags cannot be mixed, with the usual exception that
/// `_id` may be excluded from an otherwise-include projection.
pub fn parse_projection(projection: &Value) -> QueryResult<Projection> {
    let object = projection
        .as_object()
        .ok_or_else(|| InvalidQueryError::invalid_filter("projection must be a JSON object"))?;

    let mut include_id = true;
    let mut included: Vec<String> = Vec::new();
    let mut excluded: Vec<String> = Vec::new();

    for (field, flag) in object {
        let on = match flag {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() != Some(0.0),
            _ => {
                return Err(InvalidQueryError::invalid_filter(format!(
                    "projection flag for '{}' must be 0 or 1",
                    field
                )));
            }
        };

        if field == ID_FIELD {
            include_id = on;
        } else if on {
            included.push(field.clone());
        } else {
            excluded.push(field.clone());
        }
    }

    if !included.is_empty() && !excluded.is_empty() {
        return Err(InvalidQueryError::invalid_filter(
            "projection cannot mix include and exclude fields",
        ));
    }

    let projection = if included.is_empty() && !excluded.is_empty() {
        Projection {
            mode: ProjectionMode::Exclude,
            fields: excluded,
            include_id,
        }
    } else {
        // Pure-include, or an `{"_id": 0}`-only projection, which keeps
        // every caller field and just drops the id.
        let mode = if included.is_empty() {
            ProjectionMode::Exclude
        } else {
            ProjectionMode::Include
        };
        Projection {
            mode,
            fields: included,
            include_id,
        }
    };
    Ok(projection)
}
