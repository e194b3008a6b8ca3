//! Aggregation pipeline engine
//!
//! Applies stages strictly in order; each stage consumes the previous
//! stage's output rows. Evaluation is pure and deterministic, and any
//! expression failure abandons the whole pipeline.

use std::collections::HashMap;

use serde_json::Value;

use crate::document::{Document, ID_FIELD};
use crate::executor::{paginate, ResultSorter};
use crate::query::PageSpec;

use super::errors::{EvalResult, EvaluationError};
use super::expr::{number_value, numeric};
use super::stage::{Accumulator, AggregationStage, GroupStage, ProjectField, ProjectStage};

/// Runs aggregation pipelines over document sequences
pub struct PipelineEngine;

impl PipelineEngine {
    /// Runs the pipeline, returning the final ordered rows.
    pub fn run(
        documents: Vec<Document>,
        stages: &[AggregationStage],
    ) -> EvalResult<Vec<Document>> {
        let mut rows = documents;
        for stage in stages {
            rows = match stage {
                AggregationStage::Group(group) => Self::apply_group(&rows, group)?,
                AggregationStage::Project(project) => Self::apply_project(&rows, project)?,
                AggregationStage::AddFields(fields) => Self::apply_add_fields(rows, fields)?,
                AggregationStage::Sort(spec) => {
                    let mut sorted = rows;
                    ResultSorter::sort(&mut sorted, spec);
                    sorted
                }
                AggregationStage::Limit(n) => paginate(rows, &PageSpec::new(0, Some(*n))),
            };
        }
        Ok(rows)
    }

    /// Partitions rows by the evaluated key and reduces each group.
    ///
    /// Groups surface in first-encounter order; that order is an
    /// implementation detail and callers wanting a particular order must
    /// add a sort stage. An empty input yields zero groups even for a
    /// constant key.
    fn apply_group(rows: &[Document], stage: &GroupStage) -> EvalResult<Vec<Document>> {
        let mut groups: Vec<(Value, Vec<AccState>)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for row in rows {
            let key = stage.key.eval(row)?;
            // Canonical JSON text keys the partition; Value itself is not
            // hashable.
            let canonical = key.to_string();

            let slot = match slots.get(&canonical) {
                Some(&i) => i,
                None => {
                    let states = stage
                        .accumulators
                        .iter()
                        .map(|(_, acc)| AccState::new(acc))
                        .collect();
                    groups.push((key, states));
                    slots.insert(canonical, groups.len() - 1);
                    groups.len() - 1
                }
            };

            let (_, states) = &mut groups[slot];
            for ((_, acc), state) in stage.accumulators.iter().zip(states.iter_mut()) {
                state.update(acc, row)?;
            }
        }

        let mut out = Vec::with_capacity(groups.len());
        for (key, states) in groups {
            let mut doc = Document::new();
            doc.insert(ID_FIELD.to_string(), key);
            for ((name, _), state) in stage.accumulators.iter().zip(states) {
                doc.insert(name.clone(), state.finish()?);
            }
            out.push(doc);
        }
        Ok(out)
    }

    /// Reshapes each row to the projected fields. Expressions see the
    /// original row, not the partially built output.
    fn apply_project(rows: &[Document], stage: &ProjectStage) -> EvalResult<Vec<Document>> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let mut shaped = Document::new();
            if stage.include_id {
                if let Some(id) = row.get(ID_FIELD) {
                    shaped.insert(ID_FIELD.to_string(), id.clone());
                }
            }
            for (name, field) in &stage.fields {
                match field {
                    ProjectField::Include => {
                        if let Some(value) = row.get(name) {
                            shaped.insert(name.clone(), value.clone());
                        }
                    }
                    ProjectField::Computed(expr) => {
                        shaped.insert(name.clone(), expr.eval(row)?);
                    }
                }
            }
            out.push(shaped);
        }
        Ok(out)
    }

    /// Merges computed fields into each row. All expressions are evaluated
    /// against the original row before anything is merged.
    fn apply_add_fields(
        rows: Vec<Document>,
        fields: &[(String, super::expr::Expr)],
    ) -> EvalResult<Vec<Document>> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let mut computed = Vec::with_capacity(fields.len());
            for (name, expr) in fields {
                computed.push((name.clone(), expr.eval(&row)?));
            }
            let mut merged = row;
            for (name, value) in computed {
                merged.insert(name, value);
            }
            out.push(merged);
        }
        Ok(out)
    }
}

/// Running state of one accumulator within one group
enum AccState {
    Sum(f64),
    Avg { sum: f64, count: usize },
    Count(usize),
    Push(Vec<Value>),
}

impl AccState {
    fn new(accumulator: &Accumulator) -> Self {
        match accumulator {
            Accumulator::Sum(_) => AccState::Sum(0.0),
            Accumulator::Avg(_) => AccState::Avg { sum: 0.0, count: 0 },
            Accumulator::Count => AccState::Count(0),
            Accumulator::Push(_) => AccState::Push(Vec::new()),
        }
    }

    fn update(&mut self, accumulator: &Accumulator, row: &Document) -> EvalResult<()> {
        match (accumulator, self) {
            (Accumulator::Sum(expr), AccState::Sum(total)) => {
                *total += numeric(&expr.eval(row)?, "$sum")?;
            }
            (Accumulator::Avg(expr), AccState::Avg { sum, count }) => {
                *sum += numeric(&expr.eval(row)?, "$avg")?;
                *count += 1;
            }
            (Accumulator::Count, AccState::Count(n)) => {
                *n += 1;
            }
            (Accumulator::Push(expr), AccState::Push(items)) => {
                items.push(expr.eval(row)?);
            }
            // States are created from the same accumulator list, so the
            // pairs always line up.
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> EvalResult<Value> {
        match self {
            AccState::Sum(total) => number_value(total),
            AccState::Avg { sum, count } => {
                if count == 0 {
                    return Ok(Value::Null);
                }
                number_value(sum / count as f64)
            }
            AccState::Count(n) => Ok(Value::from(n as u64)),
            AccState::Push(items) => Ok(Value::Array(items)),
        }
    }
}
