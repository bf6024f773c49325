//! # Pattern Vault
//!
//! Versioned code patterns with computed quality metrics.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              apps/pattern-vault (THE BINARY)         │
//! │                                                      │
//! │   ┌──────────┐   ┌──────────┐   ┌────────────────┐   │
//! │   │   CLI    │   │ HTTP API │   │ config/storage │   │
//! │   │  (clap)  │   │  (axum)  │   │ (toml, redb)   │   │
//! │   └────┬─────┘   └────┬─────┘   └───────┬────────┘   │
//! │        └──────────────┼─────────────────┘            │
//! │                       ▼                              │
//! │               ┌───────────────┐                      │
//! │               │ pattern-core  │                      │
//! │               └───────────────┘                      │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! pattern-vault init
//! pattern-vault store -f patterns.json
//! pattern-vault find "binary search" --language python --min-rating 4
//! pattern-vault history binary_search_2
//! pattern-vault server --host 0.0.0.0 --port 8080
//! ```

use clap::Parser;
use pattern_vault::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // PATTERN_VAULT_LOG_FORMAT=json switches to machine-parseable output.
    let log_format =
        std::env::var("PATTERN_VAULT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "pattern_vault=debug,pattern_core=debug,tower_http=debug"
    } else {
        "pattern_vault=info,pattern_core=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  ┌─┐┌─┐┌┬┐┌┬┐┌─┐┬─┐┌┐┌  ┬  ┬┌─┐┬ ┬┬ ┌┬┐
  ├─┘├─┤ │  │ ├┤ ├┬┘│││  └┐┌┘├─┤│ ││  │
  ┴  ┴ ┴ ┴  ┴ └─┘┴└─┘└┘   └┘ ┴ ┴└─┘┴─┘┴

  Pattern Vault v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
