//! shelfdb - A deterministic in-memory document query and aggregation engine
//!
//! Evaluates filter predicates, projections, sort/pagination and multi-stage
//! aggregation pipelines over schema-less documents, and advises which access
//! path (index scan or full scan) a query would take.

pub mod advisor;
pub mod cli;
pub mod document;
pub mod executor;
pub mod observability;
pub mod pipeline;
pub mod query;
pub mod store;
