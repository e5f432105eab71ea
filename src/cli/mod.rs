//! Command-line surface of the journal.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::run;

#[derive(Parser, Debug)]
#[command(name = "journal", about = "Personal timestamped journal", version)]
pub struct Cli {
    /// Path to config.toml (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show the newest entries
    List {
        /// Number of pages to load (10 entries each)
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Add an entry
    Add {
        /// Entry text; words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Re-send entries whose remote write failed
    Retry,
    /// Show the configured and remembered identity
    Whoami,
    /// Forget the signed-in identity and its cached entries
    SignOut,
}
