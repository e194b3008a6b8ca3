//! Query execution subsystem for shelfdb
//!
//! Pure, synchronous evaluation over an in-memory snapshot: predicate
//! filtering, stable sorting, pagination, projection, and the executor that
//! strings them together with the index advisor's plan statistics.
//!
//! # Design Principles
//!
//! - Deterministic: same snapshot + same query → same results
//! - Pure: no I/O, no timing, no mutation of the caller's snapshot
//! - Strict: evaluation never coerces types to force a match

mod executor;
mod filters;
mod paginate;
mod project;
mod result;
mod sorter;

pub use executor::QueryExecutor;
pub use filters::PredicateFilter;
pub use paginate::paginate;
pub use project::Projector;
pub use result::ResultSet;
pub use sorter::ResultSorter;
