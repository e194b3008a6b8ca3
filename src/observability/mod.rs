//! Observability subsystem for shelfdb
//!
//! Structured JSON logging for the CLI collaborator. Observability is
//! read-only: it never affects evaluation, runs synchronously, and keeps
//! output deterministic.

mod logger;

pub use logger::{Logger, Severity};
