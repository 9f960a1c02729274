//! CLI argument definitions using clap
//!
//! Commands:
//! - criteria fetch --collection <path> [--config <path>] [--search <term>]
//! - criteria count --collection <path> [--config <path>] [--search <term>]
//! - criteria find-one --collection <path> [--config <path>]
//! - criteria sql --config <path> [--search <term>]
//! - criteria explain [--config <path>] [--search <term>]
//!
//! Each command reads an optional criteria JSON document from stdin.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Criteria engine - translate structured criteria into backend queries
#[derive(Parser, Debug)]
#[command(name = "criteria")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Collection and configuration shared by the executing commands
#[derive(Args, Debug, Clone)]
pub struct CollectionArgs {
    /// JSON file holding an array of documents
    #[arg(long)]
    pub collection: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a page of matching documents
    Fetch {
        #[command(flatten)]
        target: CollectionArgs,

        /// Free-text search across the configured search fields
        #[arg(long)]
        search: Option<String>,
    },

    /// Count matching documents
    Count {
        #[command(flatten)]
        target: CollectionArgs,

        /// Free-text search across the configured search fields
        #[arg(long)]
        search: Option<String>,
    },

    /// Fetch exactly one document; filters are required
    FindOne {
        #[command(flatten)]
        target: CollectionArgs,
    },

    /// Render fetch and count SQL for the configured table
    Sql {
        /// Path to configuration file
        #[arg(long)]
        config: PathBuf,

        /// Free-text search across the configured search fields
        #[arg(long)]
        search: Option<String>,
    },

    /// Show how the criteria would be translated
    Explain {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Free-text search across the configured search fields
        #[arg(long)]
        search: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
