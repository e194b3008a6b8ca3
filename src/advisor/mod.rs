//! Index advisor subsystem for shelfdb
//!
//! Decides which access path a query shape would use against the declared
//! indexes and models its cost over a snapshot. The store's real index
//! structures live behind the collaborator boundary; this subsystem only
//! reasons about them.
//!
//! # Design Principles
//!
//! - Deterministic: same query + same declarations → same plan
//! - Prefix rule: an index is usable only through a leading run of
//!   equality-bound fields, plus at most one range-bound field
//! - Explicit: a hint naming a missing index is an error, never a silent
//!   fallback

mod advisor;
mod errors;
mod explain;
mod index;

pub use advisor::{AccessPath, ExecutionPlan, Hint, IndexAdvisor, PlannedAccess};
pub use errors::{AdvisorResult, Severity, UnknownIndexError};
pub use explain::ExplainReport;
pub use index::IndexDefinition;
