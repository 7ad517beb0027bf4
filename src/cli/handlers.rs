// src/cli/handlers.rs
use crate::cache::{self, key, CacheOptions};
use crate::config::Config;
use crate::pipeline::finalize;
use crate::report::Report;
use crate::request::AnalysisRequest;
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

fn load_partial(path: &Path) -> Result<Report> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read partial report: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse partial report: {}", path.display()))
}

/// Merges partial reports from disk and scores the result.
///
/// # Errors
/// Returns error if the config or any partial cannot be loaded.
pub fn merge_files(repo: &Path, partials: &[PathBuf]) -> Result<Report> {
    let config = Config::load(repo)?;
    let reports = partials
        .iter()
        .map(|p| load_partial(p))
        .collect::<Result<Vec<_>>>()?;

    Ok(finalize(&reports, &config.thresholds))
}

/// Handles the merge command.
///
/// # Errors
/// Returns error if loading, merging or writing fails.
pub fn handle_merge(repo: &Path, partials: &[PathBuf], output: Option<&Path>) -> Result<()> {
    let merged = merge_files(repo, partials)?;
    let json = serde_json::to_string_pretty(&merged).context("Failed to serialize report")?;
    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            eprintln!(
                "{} merged {} partials into {} dependencies -> {}",
                "ok:".green().bold(),
                partials.len(),
                merged.dependencies.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Handles the digest command.
///
/// # Errors
/// Returns error if the root cannot be fingerprinted.
pub fn handle_digest(
    repo: &Path,
    root: &Path,
    adapter: &str,
    dependency: Option<String>,
    top_n: usize,
) -> Result<()> {
    let config = Config::load(repo)?;
    let mut request = AnalysisRequest::from_config(repo, &config);
    request.dependency = dependency;
    request.top_n = top_n;

    let key_digest = key::key_digest(&request, adapter, root)?;
    let input_digest = key::input_digest(root, request.config_path.as_deref())?;
    let out = json!({
        "adapter": adapter,
        "root": root.display().to_string(),
        "keyDigest": key_digest,
        "inputDigest": input_digest,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Handles the cache command.
///
/// # Errors
/// Returns error if the cache directory cannot be inspected or removed.
pub fn handle_cache(repo: &Path, clear: bool) -> Result<()> {
    let config = Config::load(repo)?;
    let options: &CacheOptions = &config.cache;
    let root = options.resolve_path(repo);

    if clear {
        if root.exists() {
            fs::remove_dir_all(&root)
                .with_context(|| format!("Failed to remove cache: {}", root.display()))?;
        }
        println!("{} cleared {}", "ok:".green().bold(), root.display());
        return Ok(());
    }

    let stats = cache::inspect(&root)?;
    let state = if !options.enabled {
        "disabled".yellow()
    } else if options.read_only {
        "read-only".yellow()
    } else {
        "enabled".green()
    };
    println!("{} {} ({state})", "cache:".bold(), root.display());
    println!("  pointers: {}", stats.pointers);
    println!("  objects:  {}", stats.objects);
    println!("  bytes:    {}", stats.bytes);
    Ok(())
}
