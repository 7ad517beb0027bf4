// src/report/types.rs
//! Report data model shared by language adapters, the cache and the merge engine.
//!
//! Partial reports (one adapter, one root) and the merged report use the same
//! shape; the merged one additionally carries summary, scoring and cache fields.

use crate::cache::CacheMetadata;
use crate::config::Thresholds;
use serde::{Deserialize, Serialize};

/// Schema version stamped on reports produced by this crate.
pub const REPORT_SCHEMA_VERSION: &str = "0.1.0";

/// A complete dependency-usage report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub schema_version: String,
    /// Unix epoch seconds.
    #[serde(default)]
    pub generated_at: u64,
    #[serde(default)]
    pub repo_path: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub language_breakdown: Vec<LanguageSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_uncertainty: Option<UsageUncertainty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_thresholds: Option<Thresholds>,
}

/// Usage data for one dependency of one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyReport {
    #[serde(default)]
    pub language: String,
    pub name: String,
    #[serde(default)]
    pub used_exports_count: u64,
    /// Zero means the export inventory is unknown.
    #[serde(default)]
    pub total_exports_count: u64,
    #[serde(default)]
    pub used_percent: f64,
    #[serde(default)]
    pub estimated_unused_bytes: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_used_symbols: Vec<SymbolUsage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub used_imports: Vec<ImportUse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unused_imports: Vec<ImportUse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unused_exports: Vec<SymbolRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risk_cues: Vec<RiskCue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_usage: Option<RuntimeUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codemod: Option<CodemodReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<FindingConfidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removal_candidate: Option<RemovalCandidate>,
}

impl DependencyReport {
    /// Creates an empty record for a dependency.
    #[must_use]
    pub fn new(language: &str, name: &str) -> Self {
        Self {
            language: language.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Returns true when the adapter could enumerate the package's exports.
    #[must_use]
    pub fn has_export_inventory(&self) -> bool {
        self.total_exports_count > 0
    }

    /// Recomputes `used_percent` from the counts.
    pub fn recompute_used_percent(&mut self) {
        self.used_percent = used_percent(self.used_exports_count, self.total_exports_count);
    }
}

/// Percentage of used exports, 0 when the total is unknown.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn used_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64) * 100.0
}

/// A source position, relative to the repository root once merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

/// One imported binding and where it is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportUse {
    pub name: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provenance: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub confidence_reason_codes: Vec<String>,
}

impl ImportUse {
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

/// A reference to an exported symbol of a dependency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRef {
    pub name: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub confidence_reason_codes: Vec<String>,
}

/// How often one symbol was referenced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolUsage {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub module: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    #[default]
    Low,
}

/// A signal that static analysis may be incomplete for a dependency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskCue {
    pub code: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub confidence_reason_codes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Priority {
    /// Sort rank: high first, unknown last.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
            Self::Unknown => 3,
        }
    }
}

/// An actionable suggestion for a dependency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub code: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub confidence_reason_codes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeCorrelation {
    StaticOnly,
    RuntimeOnly,
    Overlap,
}

/// Observations from a runtime trace correlated with static usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeUsage {
    #[serde(default)]
    pub load_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation: Option<RuntimeCorrelation>,
    /// Older reports only carry this flag instead of `correlation`.
    #[serde(default)]
    pub runtime_only: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<RuntimeModuleUsage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_symbols: Vec<RuntimeSymbolUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeModuleUsage {
    pub module: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSymbolUsage {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub module: String,
    pub count: u64,
}

/// Counts of import uses that could or could not be resolved statically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageUncertainty {
    #[serde(default)]
    pub confirmed_import_uses: u64,
    #[serde(default)]
    pub uncertain_import_uses: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<Location>,
}

/// Source rewrites proposed for a dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodemodReport {
    #[serde(default)]
    pub mode: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<CodemodSuggestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skips: Vec<CodemodSkip>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodemodSuggestion {
    pub file: String,
    pub line: u32,
    pub import_name: String,
    #[serde(default)]
    pub from_module: String,
    #[serde(default)]
    pub to_module: String,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub replacement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodemodSkip {
    pub file: String,
    pub line: u32,
    pub reason_code: String,
    #[serde(default)]
    pub message: String,
}

/// Confidence in the findings reported for one dependency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingConfidence {
    pub score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reason_codes: Vec<String>,
}

/// Relative importance of the three removal-candidate signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalCandidateWeights {
    pub usage: f64,
    pub impact: f64,
    pub confidence: f64,
}

/// Composite estimate of how safely a dependency could be removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalCandidate {
    pub score: f64,
    pub usage: f64,
    pub impact: f64,
    pub confidence: f64,
    pub weights: RemovalCandidateWeights,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rationale: Vec<String>,
}

/// Aggregate counts over all dependencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub dependency_count: usize,
    pub used_exports_count: u64,
    pub total_exports_count: u64,
    pub used_percent: f64,
}

/// Aggregate counts for one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSummary {
    pub language: String,
    pub dependency_count: usize,
    pub used_exports_count: u64,
    pub total_exports_count: u64,
    pub used_percent: f64,
}
