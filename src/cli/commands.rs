//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Auto-paginating client for NextToken/Limit list APIs
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service name (built-in) or definition file (YAML)
    #[arg(short, long, global = true)]
    pub service: Option<PathBuf>,

    /// Client configuration file (JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline client configuration JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// Endpoint URL override
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Region override
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a list operation, following cursors across pages
    List {
        /// Operation name (e.g. ListRules)
        operation: String,

        /// Request field as KEY=VALUE; VALUE is parsed as JSON when possible
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Maximum number of items to emit across all pages
        #[arg(long)]
        limit: Option<usize>,

        /// Resume from a token returned by an earlier call (fetches one page)
        #[arg(long)]
        next_token: Option<String>,

        /// Leading items to skip on the first page, from an earlier CURSOR message
        #[arg(long, default_value_t = 0)]
        skip: usize,

        /// Fetch a single page only
        #[arg(long)]
        no_auto_iteration: bool,
    },

    /// List operations of the service
    Operations,

    /// Validate the service definition
    Validate,

    /// List built-in services
    Services,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
