//! # hospinet CLI Module
//!
//! This module implements the CLI interface for hospinet.
//!
//! ## Available Commands
//!
//! - `clean` - Clean a raw stay table into non-overlapping stays
//! - `build` - Build a temporal network from a stay table
//! - `status` - Show network summary
//! - `project` - Project a network onto a static facility graph
//! - `timeseries` - Evaluate a metric over every outbound snapshot
//! - `convert` - Convert a network between interchange formats
//! - `hash` - Compute BLAKE3 cryptographic hash of a network

mod commands;

use crate::config::HospinetConfig;
use clap::{Parser, Subcommand, ValueEnum};
use hospinet_core::HospinetError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// hospinet - temporal networks of patient transfers
///
/// Cleans facility-stay tables, builds time-discretised transfer networks
/// and computes metric time series over their snapshots.
#[derive(Parser, Debug)]
#[command(name = "hospinet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Network interchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NetworkFormat {
    /// Versioned binary format with checksum
    Canonical,
    /// JSON node and edge lists
    Json,
    /// Whitespace-separated weighted edge list
    Lgl,
}

/// Metrics available per snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeriesMetric {
    /// Global reaching centrality (0 for snapshots with fewer than 2 nodes)
    GlobalReaching,
    /// Largest PageRank score in the snapshot
    PagerankMax,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a raw stay table (CSV) and write the resolved stays
    Clean {
        /// Input stay table
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Build a temporal network from a stay table
    Build {
        /// Input stay table (CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output network path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short = 't', long, value_enum, default_value = "canonical")]
        format: NetworkFormat,

        /// Treat the input as already clean (numeric day offsets, no overlaps)
        #[arg(long)]
        skip_clean: bool,

        /// Discretisation step in days (overrides the config file)
        #[arg(short, long)]
        discretisation: Option<i64>,

        /// Return window in time units (overrides the config file)
        #[arg(short, long)]
        return_window: Option<f64>,
    },

    /// Show network summary
    Status {
        /// Network file
        #[arg(short, long)]
        network: PathBuf,
    },

    /// Project a network onto a static facility graph (JSON)
    Project {
        /// Network file
        #[arg(short, long)]
        network: PathBuf,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate a metric over every outbound snapshot
    Timeseries {
        /// Network file
        #[arg(short, long)]
        network: PathBuf,

        /// Metric to evaluate
        #[arg(short, long, value_enum, default_value = "global-reaching")]
        metric: SeriesMetric,

        /// Fail on the first metric error instead of substituting the default
        /// (pagerank-max only)
        #[arg(long)]
        safe: bool,

        /// Value substituted for failing snapshots (pagerank-max only)
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        default: f64,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a network between interchange formats
    Convert {
        /// Input network file (any supported format)
        #[arg(short, long)]
        input: PathBuf,

        /// Output network path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short = 't', long, value_enum)]
        format: NetworkFormat,
    },

    /// Compute BLAKE3 cryptographic hash of a network
    Hash {
        /// Network file
        #[arg(short, long)]
        network: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), HospinetError> {
    let json_mode = cli.json_mode;
    let config = HospinetConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Clean { input, output } => cmd_clean(&config, json_mode, &input, &output),
        Commands::Build {
            input,
            output,
            format,
            skip_clean,
            discretisation,
            return_window,
        } => {
            let mut config = config;
            if let Some(d) = discretisation {
                config.network.discretisation = d;
            }
            if let Some(w) = return_window {
                config.network.return_window = w;
            }
            cmd_build(&config, json_mode, &input, &output, format, skip_clean)
        }
        Commands::Status { network } => cmd_status(json_mode, &network),
        Commands::Project { network, output } => cmd_project(&network, output.as_deref()),
        Commands::Timeseries {
            network,
            metric,
            safe,
            default,
            output,
        } => cmd_timeseries(json_mode, &network, metric, safe, default, output.as_deref()),
        Commands::Convert {
            input,
            output,
            format,
        } => cmd_convert(&input, &output, format),
        Commands::Hash { network } => cmd_hash(json_mode, &network),
    }
}
