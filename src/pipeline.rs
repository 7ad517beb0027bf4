// src/pipeline.rs
//! Drives adapters over their roots through the cache, then merges and scores.

use crate::cache::AnalysisCache;
use crate::config::Thresholds;
use crate::error::Result;
use crate::merge::merge_reports;
use crate::report::{rebase_report_paths, Report};
use crate::request::AnalysisRequest;
use crate::scoring::{low_confidence_warnings, score_report};
use std::path::{Path, PathBuf};

/// A language adapter: turns one root into a partial report.
pub trait Analyzer {
    /// Stable identifier, part of every cache key.
    fn id(&self) -> &str;

    /// Analyzes `root` with the request's parameters.
    ///
    /// # Errors
    /// Returns error if the adapter cannot produce a report.
    fn analyze(&self, request: &AnalysisRequest, root: &Path) -> Result<Report>;
}

/// One adapter together with the roots it should analyze, in order.
pub struct AdapterRun<'a> {
    pub analyzer: &'a dyn Analyzer,
    pub roots: Vec<PathBuf>,
}

/// Per-run counts of how each partial was obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub analyzed: usize,
    pub reused: usize,
}

/// Runs every adapter over its roots and returns the merged, scored report.
///
/// Cache trouble never fails the run; it shows up in the report's warnings.
/// Adapter failures and unreadable source files do.
///
/// # Errors
/// Returns error if an adapter fails or a root's input digest cannot be computed.
pub fn run(request: &AnalysisRequest, runs: &[AdapterRun<'_>]) -> Result<(Report, RunStats)> {
    let mut cache = AnalysisCache::new(&request.cache, &request.repo_path);
    let mut stats = RunStats::default();
    let mut partials = Vec::new();

    for adapter in runs {
        let adapter_id = adapter.analyzer.id();
        for root in &adapter.roots {
            let key = cache.prepare(request, adapter_id, root)?;
            let mut report = if let Some(cached) = cache.lookup(&key) {
                stats.reused += 1;
                cached
            } else {
                tracing::debug!(adapter = adapter_id, root = %root.display(), "analyzing");
                let fresh = adapter.analyzer.analyze(request, root)?;
                cache.store_or_warn(&key, &fresh);
                stats.analyzed += 1;
                fresh
            };
            rebase_report_paths(&mut report, root, &request.repo_path);
            partials.push(report);
        }
    }

    let mut merged = finalize(&partials, &request.thresholds);
    if merged.repo_path.is_empty() {
        merged.repo_path = request.repo_path.to_string_lossy().into_owned();
    }
    merged.warnings.extend(cache.take_warnings());
    merged.cache = Some(cache.metadata());

    Ok((merged, stats))
}

/// Merges partials and runs the scoring passes with the effective thresholds.
#[must_use]
pub fn finalize(partials: &[Report], thresholds: &Thresholds) -> Report {
    let mut merged = merge_reports(partials);
    score_report(&mut merged, thresholds.removal_candidate_weights);
    merged
        .warnings
        .extend(low_confidence_warnings(&merged.dependencies, thresholds.low_confidence_warning_percent));
    merged.effective_thresholds = Some(thresholds.clone());
    merged
}
