//! # Pattern Vault CLI Module
//!
//! ## Available Commands
//!
//! - `init` - Initialize a new store
//! - `store` - Build and store patterns from a JSON file
//! - `show` - Show one record
//! - `history` - Show the version chain of a record
//! - `find` - Filtered similarity search
//! - `status` - Catalog statistics
//! - `export` - Export all records to a file
//! - `import` - Import records from a file
//! - `server` - Start the HTTP server

mod commands;

use crate::config::{CliOverrides, VaultConfig};
use clap::{Parser, Subcommand};
use pattern_core::{ComplexityLevel, PatternError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Pattern Vault - versioned code patterns with computed quality metrics
#[derive(Parser, Debug)]
#[command(name = "pattern-vault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: ./pattern-vault.toml if present)
    #[arg(short, long, global = true, env = "PATTERN_VAULT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the pattern store [default: patterns.db]
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend: "redb" (ACID database), "file" (snapshot) or "memory" [default: redb]
    #[arg(short = 'B', long, global = true)]
    pub backend: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to [default: 127.0.0.1]
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to [default: 8080]
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show catalog statistics
    Status,

    /// Build and store patterns from a JSON file (one draft or a list)
    Store {
        /// Path to the pattern JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show a record by id
    Show {
        /// Record id, e.g. binary_search_1
        id: String,
    },

    /// Show the version chain ending at a record, newest first
    History {
        /// Record id
        id: String,
    },

    /// Search for similar patterns
    Find {
        /// Free-text query
        query: String,

        /// Restrict to a language tag
        #[arg(short, long)]
        language: Option<String>,

        /// Restrict to a complexity tier (simple, intermediate, advanced)
        #[arg(short = 'x', long)]
        complexity: Option<ComplexityLevel>,

        /// Minimum user rating (0.0 - 5.0)
        #[arg(short = 'r', long)]
        min_rating: Option<f64>,

        /// Required tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Maximum number of results to print
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Export all records
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (snapshot, json)
        #[arg(short = 't', long, default_value = "snapshot")]
        format: String,
    },

    /// Import records from a snapshot or JSON record list
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new empty store
    Init {
        /// Force initialization even if the store exists
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Configuration overrides given on the command line.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        let (host, port) = match &self.command {
            Some(Commands::Server { host, port }) => (host.clone(), *port),
            _ => (None, None),
        };
        CliOverrides {
            config: self.config.clone(),
            database: self.database.clone(),
            backend: self.backend.clone(),
            host,
            port,
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), PatternError> {
    let config = VaultConfig::load(&cli.overrides())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { .. }) => cmd_server(config).await,
        Some(Commands::Status) | None => cmd_status(&config, json_mode),
        Some(Commands::Store { file }) => cmd_store(&config, json_mode, &file),
        Some(Commands::Show { id }) => cmd_show(&config, json_mode, &id),
        Some(Commands::History { id }) => cmd_history(&config, json_mode, &id),
        Some(Commands::Find {
            query,
            language,
            complexity,
            min_rating,
            tags,
            limit,
        }) => {
            let mut request = pattern_core::SearchRequest::new(query).required_tags(tags);
            request.language = language;
            request.complexity_level = complexity;
            request.min_rating = min_rating;
            cmd_find(&config, json_mode, request, limit)
        }
        Some(Commands::Export { output, format }) => cmd_export(&config, &output, &format),
        Some(Commands::Import { input }) => cmd_import(&config, &input),
        Some(Commands::Init { force }) => cmd_init(&config, force),
    }
}

// =============================================================================
// TESTS
// =============================================================================
