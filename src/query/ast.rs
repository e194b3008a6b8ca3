//! Query AST structures
//!
//! Defines the typed query representation evaluated by the executor and
//! consulted by the index advisor.

use serde::{Deserialize, Serialize};

/// Filter operation types
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Equality: field = value (deep structural equality)
    Eq(serde_json::Value),
    /// Greater than: field > value
    Gt(serde_json::Value),
    /// Greater than or equal: field >= value
    Gte(serde_json::Value),
    /// Less than: field < value
    Lt(serde_json::Value),
    /// Less than or equal: field <= value
    Lte(serde_json::Value),
}

impl FilterOp {
    /// Returns true if this is an equality operation
    pub fn is_equality(&self) -> bool {
        matches!(self, FilterOp::Eq(_))
    }

    /// Returns true if this is a range operation
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            FilterOp::Gt(_) | FilterOp::Gte(_) | FilterOp::Lt(_) | FilterOp::Lte(_)
        )
    }

    /// Returns the operation name for explain output
    pub fn op_name(&self) -> &'static str {
        match self {
            FilterOp::Eq(_) => "eq",
            FilterOp::Gt(_) => "gt",
            FilterOp::Gte(_) => "gte",
            FilterOp::Lt(_) => "lt",
            FilterOp::Lte(_) => "lte",
        }
    }

    /// Returns the comparison value
    pub fn value(&self) -> &serde_json::Value {
        match self {
            FilterOp::Eq(v)
            | FilterOp::Gt(v)
            | FilterOp::Gte(v)
            | FilterOp::Lt(v)
            | FilterOp::Lte(v) => v,
        }
    }
}

/// A single predicate (field path + operation)
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Field path (dot-separated for nested fields)
    pub field: String,
    /// Filter operation
    pub op: FilterOp,
}

impl Predicate {
    /// Create an equality predicate
    pub fn eq(field: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq(value),
        }
    }

    /// Create a range predicate (gt)
    pub fn gt(field: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Gt(value),
        }
    }

    /// Create a range predicate (gte)
    pub fn gte(field: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Gte(value),
        }
    }

    /// Create a range predicate (lt)
    pub fn lt(field: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Lt(value),
        }
    }

    /// Create a range predicate (lte)
    pub fn lte(field: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Lte(value),
        }
    }

    /// Returns true if this is an equality predicate
    pub fn is_equality(&self) -> bool {
        self.op.is_equality()
    }

    /// Returns true if this is a range predicate
    pub fn is_range(&self) -> bool {
        self.op.is_range()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Numeric form used in filter documents and index keys (1 / -1)
    pub fn as_i64(&self) -> i64 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

/// A single sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

/// Multi-key sort specification; earlier keys dominate, ties fall back to
/// input order (the sort is stable).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub keys: Vec<SortKey>,
}

impl SortSpec {
    /// Creates an empty sort specification
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Appends an ascending key
    pub fn asc(mut self, field: impl Into<String>) -> Self {
        self.keys.push(SortKey {
            field: field.into(),
            direction: SortDirection::Asc,
        });
        self
    }

    /// Appends a descending key
    pub fn desc(mut self, field: impl Into<String>) -> Self {
        self.keys.push(SortKey {
            field: field.into(),
            direction: SortDirection::Desc,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Pagination window: drop `skip` documents, then take up to `limit`
/// (`None` = unbounded). Out-of-range values are never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub skip: usize,
    pub limit: Option<usize>,
}

impl PageSpec {
    /// Full result set, no paging
    pub fn unbounded() -> Self {
        Self {
            skip: 0,
            limit: None,
        }
    }

    pub fn new(skip: usize, limit: Option<usize>) -> Self {
        Self { skip, limit }
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Projection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Keep only the listed fields
    Include,
    /// Keep everything except the listed fields
    Exclude,
}

/// Field projection. `_id` is included by default and must be excluded
/// explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub mode: ProjectionMode,
    pub fields: Vec<String>,
    pub include_id: bool,
}

impl Projection {
    /// Keep only the given fields (plus `_id`)
    pub fn include(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            mode: ProjectionMode::Include,
            fields: fields.into_iter().map(Into::into).collect(),
            include_id: true,
        }
    }

    /// Drop the given fields
    pub fn exclude(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            mode: ProjectionMode::Exclude,
            fields: fields.into_iter().map(Into::into).collect(),
            include_id: true,
        }
    }

    /// Explicitly drop `_id` from the output
    pub fn without_id(mut self) -> Self {
        self.include_id = false;
        self
    }
}

/// A complete query shape: filter predicates (implicit AND), optional
/// projection, optional sort, pagination window.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    /// Filter predicates (all combined with AND, evaluated left to right)
    pub predicates: Vec<Predicate>,
    /// Projection (optional; full documents when absent)
    pub projection: Option<Projection>,
    /// Sort specification (optional; natural store order when absent)
    pub sort: Option<SortSpec>,
    /// Pagination window
    pub page: PageSpec,
}

impl QuerySpec {
    /// Creates an empty query matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Adds an equality filter
    pub fn filter_eq(self, field: impl Into<String>, value: serde_json::Value) -> Self {
        self.with_predicate(Predicate::eq(field, value))
    }

    /// Sets the projection
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Sets the sort specification
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the pagination window
    pub fn with_page(mut self, page: PageSpec) -> Self {
        self.page = page;
        self
    }
}
