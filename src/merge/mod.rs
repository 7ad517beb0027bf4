// src/merge/mod.rs
//! Combines partial reports (one per adapter and root) into one report.
//!
//! The output is canonical: dependencies are unique per `(language, name)`
//! and sorted by that key, so the order of the partials never changes the
//! shape of the result.

pub mod dependency;
pub mod keyed;

pub use self::dependency::{
    merge_dependency, merge_runtime_usage, merge_usage_uncertainty, TOP_SYMBOLS_CAP,
    UNCERTAINTY_SAMPLE_CAP,
};

use crate::report::{DependencyReport, Report, REPORT_SCHEMA_VERSION};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

/// Merges dependency lists, collapsing duplicates into their first occurrence.
#[must_use]
pub fn merge_dependencies<'a, I>(dependencies: I) -> Vec<DependencyReport>
where
    I: IntoIterator<Item = &'a DependencyReport>,
{
    let mut by_key: BTreeMap<(String, String), DependencyReport> = BTreeMap::new();
    for dep in dependencies {
        match by_key.entry((dep.language.clone(), dep.name.clone())) {
            Entry::Occupied(mut slot) => {
                let merged = merge_dependency(slot.get(), dep);
                slot.insert(merged);
            }
            Entry::Vacant(slot) => {
                let mut first = dep.clone();
                first.recompute_used_percent();
                first.confidence = None;
                first.removal_candidate = None;
                slot.insert(first);
            }
        }
    }
    by_key.into_values().collect()
}

/// Merges partial reports into one report.
///
/// Warnings keep their first-seen order without duplicates, the timestamp is
/// the latest one seen, and the summary is recomputed. Inputs are not
/// modified.
#[must_use]
pub fn merge_reports(partials: &[Report]) -> Report {
    let mut merged = Report {
        dependencies: merge_dependencies(partials.iter().flat_map(|p| p.dependencies.iter())),
        ..Report::default()
    };

    let mut seen = HashSet::new();
    for partial in partials {
        if merged.schema_version.is_empty() {
            merged.schema_version.clone_from(&partial.schema_version);
        }
        if merged.repo_path.is_empty() {
            merged.repo_path.clone_from(&partial.repo_path);
        }
        merged.generated_at = merged.generated_at.max(partial.generated_at);
        for warning in &partial.warnings {
            if seen.insert(warning.as_str()) {
                merged.warnings.push(warning.clone());
            }
        }
        merged.usage_uncertainty = merge_usage_uncertainty(
            merged.usage_uncertainty.as_ref(),
            partial.usage_uncertainty.as_ref(),
        );
    }

    if merged.schema_version.is_empty() {
        merged.schema_version = REPORT_SCHEMA_VERSION.to_string();
    }
    merged.refresh_summary();
    merged
}
