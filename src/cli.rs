//! CLI argument parsing for revertir

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "revertir")]
#[command(version)]
#[command(about = "Detect identity reverts in revision histories", long_about = None)]
pub struct Cli {
    /// Load detector settings from a TOML file (flags override it)
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract reverts from page-partitioned JSON revision documents
    Revdocs(RevdocsArgs),
    /// Check the revert status of one revision in a JSON-lines history
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct RevdocsArgs {
    /// Files of JSON revision documents, one per line (default: stdin)
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Maximum number of revisions a revert can span (default: 15)
    #[arg(long = "radius", value_name = "REVS")]
    pub radius: Option<usize>,

    /// Use the sha1 field even if a text field is available
    #[arg(long = "use-sha1")]
    pub use_sha1: bool,

    /// Write one output file per input into this directory (default: stdout)
    #[arg(long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Print per-page progress to stderr: `.` per revision, `r` per revert
    #[arg(long = "verbose")]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON-lines file of revisions (id, page_id, timestamp, sha1)
    #[arg(value_name = "HISTORY")]
    pub history: PathBuf,

    /// Revision to check
    #[arg(value_name = "REV_ID")]
    pub rev_id: u64,

    /// Maximum number of revisions a revert can span (default: 15)
    #[arg(long = "radius", value_name = "REVS")]
    pub radius: Option<usize>,

    /// Page of the revision (looked up when omitted)
    #[arg(long = "page-id", value_name = "ID")]
    pub page_id: Option<u64>,

    /// Only count reverting revisions saved at or before this RFC 3339 time
    #[arg(long = "before", value_name = "TIMESTAMP")]
    pub before: Option<chrono::DateTime<chrono::Utc>>,

    /// Only count reverting revisions saved within this many seconds
    #[arg(long = "window", value_name = "SECONDS")]
    pub window: Option<i64>,
}
