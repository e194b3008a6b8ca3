//! CLI argument definitions using clap
//!
//! Commands:
//! - shelfdb seed
//! - shelfdb insert <doc-json>
//! - shelfdb query <filter-json> [--project ..] [--sort ..] [--skip ..] [--limit ..] [--hint ..] [--explain]
//! - shelfdb update <filter-json> <set-json>
//! - shelfdb delete <filter-json>
//! - shelfdb aggregate <pipeline-json>
//! - shelfdb index create|list|explain

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// shelfdb - A deterministic in-memory document query and aggregation engine
#[derive(Parser, Debug)]
#[command(name = "shelfdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON data file
    #[arg(long, global = true, default_value = "./shelfdb.json")]
    pub data: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reset the data file with the ten-book sample corpus
    Seed,

    /// Insert one document
    Insert {
        /// Document as JSON
        document: String,
    },

    /// Run a filtered query
    Query {
        /// Filter document as JSON, e.g. '{"published_year": {"$gt": 2000}}'
        filter: String,

        /// Projection document as JSON, e.g. '{"_id": 0, "title": 1}'
        #[arg(long)]
        project: Option<String>,

        /// Sort document as JSON, e.g. '{"price": -1}'
        #[arg(long)]
        sort: Option<String>,

        /// Documents to skip
        #[arg(long, default_value_t = 0)]
        skip: usize,

        /// Maximum documents to return
        #[arg(long)]
        limit: Option<usize>,

        /// Access-path hint: an index name or $natural
        #[arg(long)]
        hint: Option<String>,

        /// Report plan statistics instead of documents
        #[arg(long)]
        explain: bool,
    },

    /// Set fields on every matching document
    Update {
        /// Filter document as JSON
        filter: String,
        /// Fields to set, as JSON
        set: String,
    },

    /// Delete every matching document
    Delete {
        /// Filter document as JSON
        filter: String,
    },

    /// Run an aggregation pipeline
    Aggregate {
        /// Pipeline as a JSON array of stages
        pipeline: String,
    },

    /// Manage index declarations
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum IndexAction {
    /// Declare an index from a key document, e.g. '{"author": 1, "published_year": 1}'
    Create {
        /// Index keys as JSON
        keys: String,

        /// Index name (derived from the keys when omitted)
        #[arg(long)]
        name: Option<String>,
    },

    /// List declared indexes
    List,

    /// Show the access path a query would take
    Explain {
        /// Filter document as JSON
        filter: String,

        /// Sort document as JSON
        #[arg(long)]
        sort: Option<String>,

        /// Access-path hint: an index name or $natural
        #[arg(long)]
        hint: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
