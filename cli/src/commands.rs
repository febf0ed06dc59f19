pub mod check;
pub mod conditions;
pub mod score;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bidgate")]
#[command(about = "Reputation-driven listing admission.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Give up on a store read after this many milliseconds
    #[arg(long, global = true, default_value_t = 2000)]
    pub timeout_ms: u64,

    /// Only count category listings that overlap the requested window
    #[arg(long, global = true)]
    pub category_window: bool,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the thresholds in effect and where they come from
    #[command(alias = "c")]
    Conditions { snapshot: PathBuf },
    /// Show a user's trust score and the quota it earns
    #[command(alias = "s")]
    Score {
        snapshot: PathBuf,
        #[arg(long)]
        user: u64,
    },
    /// Decide whether a seller may put up a new listing
    #[command(alias = "k")]
    Check {
        snapshot: PathBuf,
        #[arg(long)]
        seller: u64,
        #[arg(long)]
        category: u64,
        /// RFC 3339 start, e.g. 2026-05-01T00:00:00Z
        #[arg(long)]
        start: DateTime<Utc>,
        #[arg(long)]
        end: DateTime<Utc>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
