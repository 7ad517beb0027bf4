// src/bin/lopper.rs
use std::process;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use lopper_core::cli::handlers;
use lopper_core::cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    dispatch(&cli)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "lopper_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Merge { partials, output } => {
            handlers::handle_merge(&cli.repo, partials, output.as_deref())
        }
        Commands::Digest {
            root,
            adapter,
            dependency,
            top_n,
        } => handlers::handle_digest(&cli.repo, root, adapter, dependency.clone(), *top_n),
        Commands::Cache { clear } => handlers::handle_cache(&cli.repo, *clear),
    }
}
