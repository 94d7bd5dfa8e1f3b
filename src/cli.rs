//! Command-line arguments. Every flag falls back to an environment variable,
//! so the binary can run with no arguments from a scheduled job.

use std::path::PathBuf;

use clap::Parser;
use pagesync::pipeline::runtime::ClearPolicy;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pagesync",
    about = "Sync index.json page descriptors into a search table",
    version
)]
pub struct Args {
    /// Root directory holding the index.json tree
    #[arg(short, long, env = "CONTENT_DIRECTORY")]
    pub content_dir: PathBuf,

    /// SQLite database file holding the search table
    #[arg(long, env = "SEARCH_DATABASE", default_value = "data/search.sqlite")]
    pub database: PathBuf,

    /// Destination table name
    #[arg(short, long, env = "RESOURCE_SEARCH_TABLE", default_value = "resource_search")]
    pub table: String,

    /// Delete every existing row before syncing
    #[arg(long, env = "CLEAR_TABLE")]
    pub clear_table: bool,

    /// Print rows instead of writing them
    #[arg(long, env = "DRY_RUN")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "LOG_LEVEL",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: String,
}

impl Args {
    pub fn clear_policy(&self) -> ClearPolicy {
        if self.clear_table {
            ClearPolicy::ScanAndDelete
        } else {
            ClearPolicy::Retain
        }
    }
}
