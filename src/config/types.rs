// src/config/types.rs
use crate::report::RemovalCandidateWeights;
use crate::scoring::DEFAULT_REMOVAL_CANDIDATE_WEIGHTS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[cache]` section of `lopper.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub read_only: bool,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self { enabled: true, path: None, read_only: false }
    }
}

/// Partial weight overrides; unset fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightOverrides {
    #[serde(default)]
    pub usage: Option<f64>,
    #[serde(default)]
    pub impact: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// `[thresholds]` section of `lopper.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    #[serde(default)]
    pub fail_on_increase_percent: Option<f64>,
    #[serde(default)]
    pub low_confidence_warning_percent: Option<f64>,
    #[serde(default)]
    pub min_usage_percent_for_recommendations: Option<f64>,
    #[serde(default)]
    pub removal_candidate_weights: Option<WeightOverrides>,
}

/// Effective thresholds after layering overrides onto defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub fail_on_increase_percent: f64,
    pub low_confidence_warning_percent: f64,
    pub min_usage_percent_for_recommendations: f64,
    pub removal_candidate_weights: RemovalCandidateWeights,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fail_on_increase_percent: default_fail_on_increase(),
            low_confidence_warning_percent: default_low_confidence_warning(),
            min_usage_percent_for_recommendations: default_min_usage_for_recommendations(),
            removal_candidate_weights: DEFAULT_REMOVAL_CANDIDATE_WEIGHTS,
        }
    }
}

impl Thresholds {
    /// Returns a copy with every set override applied.
    #[must_use]
    pub fn with_overrides(&self, overrides: &ThresholdOverrides) -> Self {
        let mut out = self.clone();
        if let Some(v) = overrides.fail_on_increase_percent {
            out.fail_on_increase_percent = v;
        }
        if let Some(v) = overrides.low_confidence_warning_percent {
            out.low_confidence_warning_percent = v;
        }
        if let Some(v) = overrides.min_usage_percent_for_recommendations {
            out.min_usage_percent_for_recommendations = v;
        }
        if let Some(w) = &overrides.removal_candidate_weights {
            let weights = &mut out.removal_candidate_weights;
            weights.usage = w.usage.unwrap_or(weights.usage);
            weights.impact = w.impact.unwrap_or(weights.impact);
            weights.confidence = w.confidence.unwrap_or(weights.confidence);
        }
        out
    }
}

const fn default_true() -> bool { true }
const fn default_fail_on_increase() -> f64 { 0.0 }
const fn default_low_confidence_warning() -> f64 { 40.0 }
const fn default_min_usage_for_recommendations() -> f64 { 40.0 }

/// On-disk shape of `lopper.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LopperToml {
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}
