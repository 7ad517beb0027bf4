// src/scoring/removal.rs
//! Removal-candidate scoring.
//!
//! Three 0-100 signals are blended with normalized weights:
//! - usage: `100 - used_percent` (0 when the export inventory is unknown),
//! - impact: unused exports relative to the report's largest unused count,
//! - confidence: `100 - penalties` from the shared penalty model.

use super::{assess_penalties, round1};
use crate::report::{used_percent, DependencyReport, RemovalCandidate, RemovalCandidateWeights};

pub const DEFAULT_REMOVAL_CANDIDATE_WEIGHTS: RemovalCandidateWeights = RemovalCandidateWeights {
    usage: 0.50,
    impact: 0.30,
    confidence: 0.20,
};

/// Scales weights to sum to 1.
///
/// Any negative or non-finite weight, or a non-positive sum, yields
/// [`DEFAULT_REMOVAL_CANDIDATE_WEIGHTS`] unchanged.
#[must_use]
pub fn normalize_removal_candidate_weights(weights: RemovalCandidateWeights) -> RemovalCandidateWeights {
    let parts = [weights.usage, weights.impact, weights.confidence];
    if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return DEFAULT_REMOVAL_CANDIDATE_WEIGHTS;
    }
    let sum: f64 = parts.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return DEFAULT_REMOVAL_CANDIDATE_WEIGHTS;
    }
    RemovalCandidateWeights {
        usage: weights.usage / sum,
        impact: weights.impact / sum,
        confidence: weights.confidence / sum,
    }
}

fn unused_export_count(dep: &DependencyReport) -> u64 {
    dep.total_exports_count.saturating_sub(dep.used_exports_count)
}

/// Computes the removal candidate for one dependency.
///
/// `max_unused` is the largest unused export count across the report.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn removal_candidate(
    dep: &DependencyReport,
    max_unused: u64,
    weights: RemovalCandidateWeights,
) -> RemovalCandidate {
    let weights = normalize_removal_candidate_weights(weights);

    let usage = if dep.has_export_inventory() {
        (100.0 - used_percent(dep.used_exports_count, dep.total_exports_count)).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let impact = if max_unused == 0 {
        0.0
    } else {
        (unused_export_count(dep) as f64 / max_unused as f64 * 100.0).clamp(0.0, 100.0)
    };
    let assessment = assess_penalties(dep);
    let confidence = assessment.score();

    let score = weights.usage * usage + weights.impact * impact + weights.confidence * confidence;

    RemovalCandidate {
        score: round1(score),
        usage: round1(usage),
        impact: round1(impact),
        confidence: round1(confidence),
        weights,
        rationale: assessment.rationale,
    }
}

/// Recomputes the removal candidate of every dependency.
pub fn annotate_removal_candidates(dependencies: &mut [DependencyReport], weights: RemovalCandidateWeights) {
    let max_unused = dependencies.iter().map(unused_export_count).max().unwrap_or(0);
    for dep in dependencies.iter_mut() {
        let candidate = removal_candidate(dep, max_unused, weights);
        dep.removal_candidate = Some(candidate);
    }
}
