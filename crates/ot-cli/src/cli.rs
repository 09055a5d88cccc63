//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Overtime evidence estimator.
///
/// Correlates timestamped activity evidence (commits, merged reviews,
/// meetings, chat messages) against a configured work schedule and
/// estimates outside-hours time per day.
#[derive(Debug, Parser)]
#[command(name = "ot", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Collect evidence and write per-event and per-day reports.
    Report {
        /// Override the start of the reporting range (YYYY-MM-DD).
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Override the end of the reporting range (YYYY-MM-DD).
        #[arg(long)]
        until: Option<NaiveDate>,

        /// Print the daily summary as JSON to stdout instead of a CSV.
        #[arg(long)]
        json: bool,

        /// Directory the CSV files are written into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}
