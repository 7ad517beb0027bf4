use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lopper", version, about = "Dependency usage cache, merge and scoring")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Repository root (config file and default cache location)
    #[arg(long, global = true, default_value = ".")]
    pub repo: PathBuf,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge partial report JSON files and score the result
    Merge {
        /// Partial reports, one per adapter and root
        #[arg(required = true, value_name = "FILE")]
        partials: Vec<PathBuf>,
        /// Write the merged report here instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the cache key and input digests for a root
    Digest {
        /// Root to fingerprint
        root: PathBuf,
        /// Adapter the key is computed for
        #[arg(long, default_value = "js-ts")]
        adapter: String,
        /// Restrict to a single dependency
        #[arg(long)]
        dependency: Option<String>,
        #[arg(long, default_value_t = 0)]
        top_n: usize,
    },
    /// Show or clear the analysis cache
    Cache {
        /// Delete every cached entry
        #[arg(long)]
        clear: bool,
    },
}
