//! # hospinet
//!
//! The main binary for the hospinet temporal-network pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              apps/hospinet (THE BINARY)              │
//! │                                                      │
//! │   ┌─────────────┐   ┌─────────────┐   ┌──────────┐   │
//! │   │    CLI      │   │   Config    │   │  File    │   │
//! │   │   (clap)    │   │   (toml)    │   │  I/O     │   │
//! │   └──────┬──────┘   └──────┬──────┘   └────┬─────┘   │
//! │          └─────────────────┼───────────────┘         │
//! │                            ▼                         │
//! │                    ┌───────────────┐                 │
//! │                    │ hospinet-core │                 │
//! │                    │  (THE LOGIC)  │                 │
//! │                    └───────────────┘                 │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! hospinet clean -i stays.csv -o clean.csv
//! hospinet build -i clean.csv -o network.bin --skip-clean
//! hospinet timeseries -n network.bin -m global-reaching
//! ```

use clap::Parser;
use hospinet::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // HOSPINET_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("HOSPINET_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "hospinet=debug,hospinet_core=debug"
    } else if cli.quiet {
        "hospinet=warn,hospinet_core=warn"
    } else {
        "hospinet=info,hospinet_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr; stdout carries command output.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
