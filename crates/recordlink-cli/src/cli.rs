//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// recordlink - fuzzy record-linkage matching engine
#[derive(Parser, Debug)]
#[command(name = "recordlink")]
#[command(about = "Link records between two tables by fuzzy string comparison", long_about = None)]
#[command(version)]
pub struct Args {
    /// First input table (CSV or JSON)
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// Second input table (CSV or JSON)
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Matching plan, as JSON (see recordlink-core::PlanFile)
    #[arg(short, long, value_name = "FILE")]
    pub plan: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "csv", value_enum)]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Suppress progress/alert messages on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Delimited CSV
    Csv,
    /// JSON array of row objects
    Json,
}
