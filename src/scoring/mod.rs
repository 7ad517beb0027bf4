// src/scoring/mod.rs
//! Derived scores for merged dependencies.
//!
//! Both passes read only primary data (counts, imports, runtime usage, risk
//! cues) and overwrite the derived fields, so running them again is harmless.

pub mod confidence;
pub mod removal;

pub use self::confidence::{annotate_finding_confidence, low_confidence_warnings};
pub use self::removal::{
    annotate_removal_candidates, normalize_removal_candidate_weights, removal_candidate,
    DEFAULT_REMOVAL_CANDIDATE_WEIGHTS,
};

use crate::report::{DependencyReport, RemovalCandidateWeights, Report, RuntimeCorrelation, Severity};

pub const REASON_MISSING_INVENTORY: &str = "missing-inventory";
pub const REASON_RUNTIME_ONLY: &str = "runtime-only";
pub const REASON_WILDCARD: &str = "wildcard";
pub const REASON_RISK_HIGH: &str = "risk-high";
pub const REASON_RISK_MEDIUM: &str = "risk-medium";
pub const REASON_RISK_LOW: &str = "risk-low";

const PENALTY_MISSING_INVENTORY: f64 = 35.0;
const PENALTY_RUNTIME_ONLY: f64 = 20.0;
const PENALTY_WILDCARD: f64 = 15.0;
const PENALTY_RISK_HIGH: f64 = 20.0;
const PENALTY_RISK_MEDIUM: f64 = 12.0;
const PENALTY_RISK_LOW: f64 = 6.0;

/// Penalties that fired for one dependency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenaltyAssessment {
    pub total: f64,
    /// Reason codes in fixed priority order, each at most once.
    pub reason_codes: Vec<&'static str>,
    /// Human-readable line per fired penalty.
    pub rationale: Vec<String>,
}

impl PenaltyAssessment {
    /// `100 - total`, clamped to `0..=100`.
    #[must_use]
    pub fn score(&self) -> f64 {
        (100.0 - self.total).clamp(0.0, 100.0)
    }

    fn add(&mut self, code: &'static str, points: f64, what: &str) {
        self.total += points;
        if !self.reason_codes.contains(&code) {
            self.reason_codes.push(code);
        }
        self.rationale.push(format!("{what} (-{points})"));
    }
}

/// Runtime traces saw the dependency but static analysis did not.
#[must_use]
pub fn is_runtime_only(dep: &DependencyReport) -> bool {
    dep.runtime_usage.as_ref().is_some_and(|r| match r.correlation {
        Some(correlation) => correlation == RuntimeCorrelation::RuntimeOnly,
        None => r.runtime_only,
    })
}

/// Evaluates the penalty model for one dependency.
#[must_use]
pub fn assess_penalties(dep: &DependencyReport) -> PenaltyAssessment {
    let mut assessment = PenaltyAssessment::default();

    if !dep.has_export_inventory() {
        assessment.add(REASON_MISSING_INVENTORY, PENALTY_MISSING_INVENTORY, "export inventory unavailable");
    }
    if is_runtime_only(dep) {
        assessment.add(REASON_RUNTIME_ONLY, PENALTY_RUNTIME_ONLY, "used only at runtime");
    }
    let has_wildcard = dep
        .used_imports
        .iter()
        .chain(&dep.unused_imports)
        .any(|i| i.is_wildcard());
    if has_wildcard {
        assessment.add(REASON_WILDCARD, PENALTY_WILDCARD, "wildcard import");
    }

    for (severity, code, points) in [
        (Severity::High, REASON_RISK_HIGH, PENALTY_RISK_HIGH),
        (Severity::Medium, REASON_RISK_MEDIUM, PENALTY_RISK_MEDIUM),
        (Severity::Low, REASON_RISK_LOW, PENALTY_RISK_LOW),
    ] {
        for cue in dep.risk_cues.iter().filter(|c| c.severity == severity) {
            assessment.add(code, points, &format!("risk cue {}", cue.code));
        }
    }

    assessment
}

/// Runs both scoring passes over a report.
pub fn score_report(report: &mut Report, weights: RemovalCandidateWeights) {
    annotate_finding_confidence(&mut report.dependencies);
    annotate_removal_candidates(&mut report.dependencies, weights);
}

/// Rounds to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
