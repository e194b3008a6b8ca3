//! Aggregation stage model and parsing
//!
//! Stages are parsed strictly from the Mongo-style JSON array form; unknown
//! stage or accumulator operators are rejected with the offending key named.

use serde_json::Value;

use crate::query::{parse_sort, InvalidQueryError, QueryResult, SortSpec};
use crate::document::ID_FIELD;

use super::expr::{parse_expr, Expr};

/// Per-group reduction functions
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Numeric sum of the expression over the group
    Sum(Expr),
    /// Numeric average of the expression over the group
    Avg(Expr),
    /// Number of documents in the group
    Count,
    /// Collects the expression's values in encounter order
    Push(Expr),
}

/// Group stage: a key expression plus named accumulators
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStage {
    /// Grouping key expression; distinct evaluated values become groups
    pub key: Expr,
    /// (output field, accumulator) pairs, in declaration order
    pub accumulators: Vec<(String, Accumulator)>,
}

/// One output field of a projection stage
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectField {
    /// Copy the field from the input row
    Include,
    /// Computed from an expression over the input row
    Computed(Expr),
}

/// Projection stage: named output fields; unlisted fields are dropped and
/// `_id` rides along unless excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStage {
    pub fields: Vec<(String, ProjectField)>,
    pub include_id: bool,
}

/// One ordered transformation step in an aggregation pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationStage {
    /// Partition rows by a key expression and reduce each group
    Group(GroupStage),
    /// Reshape rows to the named fields
    Project(ProjectStage),
    /// Merge computed fields into each row
    AddFields(Vec<(String, Expr)>),
    /// Stable multi-key sort of the current rows
    Sort(SortSpec),
    /// Keep at most the first N rows
    Limit(usize),
}

/// Parses a JSON pipeline (array of single-operator stage documents).
pub fn parse_pipeline(pipeline: &Value) -> QueryResult<Vec<AggregationStage>> {
    let stages = pipeline
        .as_array()
        .ok_or_else(|| InvalidQueryError::invalid_pipeline("pipeline must be a JSON array"))?;
    stages.iter().map(parse_stage).collect()
}

fn parse_stage(stage: &Value) -> QueryResult<AggregationStage> {
    let object = stage
        .as_object()
        .ok_or_else(|| InvalidQueryError::invalid_pipeline("each stage must be a JSON object"))?;
    if object.len() != 1 {
        return Err(InvalidQueryError::invalid_pipeline(
            "each stage must have exactly one operator",
        ));
    }
    let (op, body) = match object.iter().next() {
        Some(entry) => entry,
        None => {
            return Err(InvalidQueryError::invalid_pipeline(
                "each stage must have exactly one operator",
            ))
        }
    };

    match op.as_str() {
        "$group" => parse_group(body),
        "$project" => parse_project(body),
        "$addFields" => parse_add_fields(body),
        "$sort" => Ok(AggregationStage::Sort(parse_sort(body)?)),
        "$limit" => {
            let limit = body.as_u64().ok_or_else(|| {
                InvalidQueryError::invalid_pipeline("$limit must be a non-negative integer")
            })?;
            Ok(AggregationStage::Limit(limit as usize))
        }
        other => Err(InvalidQueryError::invalid_operator(other.to_string())),
    }
}

fn parse_group(body: &Value) -> QueryResult<AggregationStage> {
    let object = body
        .as_object()
        .ok_or_else(|| InvalidQueryError::invalid_pipeline("$group must be a JSON object"))?;

    let key = match object.get(ID_FIELD) {
        Some(id) => parse_expr(id)?,
        None => {
            return Err(InvalidQueryError::invalid_pipeline(
                "$group requires an _id key expression",
            ));
        }
    };

    let mut accumulators = Vec::new();
    for (name, spec) in object {
        if name == ID_FIELD {
            continue;
        }
        accumulators.push((name.clone(), parse_accumulator(name, spec)?));
    }

    Ok(AggregationStage::Group(GroupStage { key, accumulators }))
}

fn parse_accumulator(field: &str, spec: &Value) -> QueryResult<Accumulator> {
    let object = match spec.as_object() {
        Some(map) if map.len() == 1 => map,
        _ => {
            return Err(InvalidQueryError::invalid_pipeline(format!(
                "accumulator for '{}' must be a single-operator object",
                field
            )));
        }
    };
    let (op, body) = match object.iter().next() {
        Some(entry) => entry,
        None => {
            return Err(InvalidQueryError::invalid_pipeline(format!(
                "accumulator for '{}' must be a single-operator object",
                field
            )))
        }
    };

    match op.as_str() {
        "$sum" => Ok(Accumulator::Sum(parse_expr(body)?)),
        "$avg" => Ok(Accumulator::Avg(parse_expr(body)?)),
        "$push" => Ok(Accumulator::Push(parse_expr(body)?)),
        "$count" => Ok(Accumulator::Count),
        other => Err(InvalidQueryError::invalid_operator(other.to_string())),
    }
}

fn parse_project(body: &Value) -> QueryResult<AggregationStage> {
    let object = body
        .as_object()
        .ok_or_else(|| InvalidQueryError::invalid_pipeline("$project must be a JSON object"))?;

    let mut include_id = true;
    let mut fields = Vec::new();
    for (name, spec) in object {
        match spec {
            Value::Bool(false) if name == ID_FIELD => include_id = false,
            Value::Number(n) if name == ID_FIELD && n.as_f64() == Some(0.0) => include_id = false,
            Value::Bool(true) => fields.push((name.clone(), ProjectField::Include)),
            Value::Bool(false) => {
                return Err(InvalidQueryError::invalid_pipeline(format!(
                    "$project can only exclude '_id', not '{}'",
                    name
                )));
            }
            Value::Number(n) => {
                if n.as_f64() == Some(0.0) {
                    return Err(InvalidQueryError::invalid_pipeline(format!(
                        "$project can only exclude '_id', not '{}'",
                        name
                    )));
                }
                fields.push((name.clone(), ProjectField::Include));
            }
            other => fields.push((name.clone(), ProjectField::Computed(parse_expr(other)?))),
        }
    }

    Ok(AggregationStage::Project(ProjectStage { fields, include_id }))
}

fn parse_add_fields(body: &Value) -> QueryResult<AggregationStage> {
    let object = body
        .as_object()
        .ok_or_else(|| InvalidQueryError::invalid_pipeline("$addFields must be a JSON object"))?;

    let mut fields = Vec::with_capacity(object.len());
    for (name, spec) in object {
        fields.push((name.clone(), parse_expr(spec)?));
    }
    Ok(AggregationStage::AddFields(fields))
}
