// src/merge/dependency.rs
//! Merging two records for the same `(language, name)` dependency.

use super::keyed::{merge_counted, merge_keyed, merge_keyed_with, Counted};
use crate::report::{
    CodemodReport, DependencyReport, ImportUse, Location, Recommendation, RiskCue,
    RuntimeCorrelation, RuntimeModuleUsage, RuntimeSymbolUsage, RuntimeUsage, SymbolRef,
    SymbolUsage, UsageUncertainty,
};
use std::collections::BTreeSet;

/// Maximum entries kept in top-symbol tables.
pub const TOP_SYMBOLS_CAP: usize = 5;

/// Maximum uncertainty sample locations kept.
pub const UNCERTAINTY_SAMPLE_CAP: usize = 5;

impl Counted for SymbolUsage {
    fn label(&self) -> &str {
        &self.name
    }
    fn count(&self) -> u64 {
        self.count
    }
    fn add_count(&mut self, n: u64) {
        self.count += n;
    }
}

impl Counted for RuntimeModuleUsage {
    fn label(&self) -> &str {
        &self.module
    }
    fn count(&self) -> u64 {
        self.count
    }
    fn add_count(&mut self, n: u64) {
        self.count += n;
    }
}

impl Counted for RuntimeSymbolUsage {
    fn label(&self) -> &str {
        &self.symbol
    }
    fn count(&self) -> u64 {
        self.count
    }
    fn add_count(&mut self, n: u64) {
        self.count += n;
    }
}

/// Merges two records of the same dependency into a new record.
///
/// Counts are summed and `used_percent` is recomputed from the sums. Derived
/// scoring fields are cleared; the scorer recomputes them over the merged list.
#[must_use]
pub fn merge_dependency(left: &DependencyReport, right: &DependencyReport) -> DependencyReport {
    let used_imports = merge_imports(&left.used_imports, &right.used_imports);
    let used_keys: BTreeSet<(String, String)> = used_imports.iter().map(import_key).collect();
    let unused_imports: Vec<ImportUse> = merge_imports(&left.unused_imports, &right.unused_imports)
        .into_iter()
        .filter(|i| !used_keys.contains(&import_key(i)))
        .collect();

    let mut merged = DependencyReport {
        language: left.language.clone(),
        name: left.name.clone(),
        used_exports_count: left.used_exports_count + right.used_exports_count,
        total_exports_count: left.total_exports_count + right.total_exports_count,
        used_percent: 0.0,
        estimated_unused_bytes: left.estimated_unused_bytes + right.estimated_unused_bytes,
        top_used_symbols: merge_counted(
            &left.top_used_symbols,
            &right.top_used_symbols,
            |s| (s.module.clone(), s.name.clone()),
            Some(TOP_SYMBOLS_CAP),
        ),
        used_imports,
        unused_imports,
        unused_exports: merge_symbol_refs(&left.unused_exports, &right.unused_exports),
        risk_cues: merge_risk_cues(&left.risk_cues, &right.risk_cues),
        recommendations: merge_recommendations(&left.recommendations, &right.recommendations),
        runtime_usage: merge_runtime_usage(left.runtime_usage.as_ref(), right.runtime_usage.as_ref()),
        codemod: merge_codemod(left.codemod.as_ref(), right.codemod.as_ref()),
        confidence: None,
        removal_candidate: None,
    };
    merged.recompute_used_percent();
    merged
}

fn import_key(import: &ImportUse) -> (String, String) {
    (import.module.clone(), import.name.clone())
}

/// Merges import uses by `(module, name)`, concatenating their locations.
#[must_use]
pub fn merge_imports(left: &[ImportUse], right: &[ImportUse]) -> Vec<ImportUse> {
    merge_keyed_with(
        left,
        right,
        import_key,
        |existing, item| {
            existing.locations.extend(item.locations.iter().cloned());
            for source in &item.provenance {
                if !existing.provenance.contains(source) {
                    existing.provenance.push(source.clone());
                }
            }
        },
        |a, b| a.module.cmp(&b.module).then_with(|| a.name.cmp(&b.name)),
    )
}

#[must_use]
pub fn merge_symbol_refs(left: &[SymbolRef], right: &[SymbolRef]) -> Vec<SymbolRef> {
    merge_keyed(
        left,
        right,
        |s| (s.module.clone(), s.name.clone()),
        |a, b| a.module.cmp(&b.module).then_with(|| a.name.cmp(&b.name)),
    )
}

#[must_use]
pub fn merge_risk_cues(left: &[RiskCue], right: &[RiskCue]) -> Vec<RiskCue> {
    merge_keyed(left, right, |c| c.code.clone(), |a, b| a.code.cmp(&b.code))
}

#[must_use]
pub fn merge_recommendations(left: &[Recommendation], right: &[Recommendation]) -> Vec<Recommendation> {
    merge_keyed(
        left,
        right,
        |r| r.code.clone(),
        |a, b| {
            a.priority
                .rank()
                .cmp(&b.priority.rank())
                .then_with(|| a.code.cmp(&b.code))
        },
    )
}

/// Merges codemod output; an absent side yields a copy of the other.
#[must_use]
pub fn merge_codemod(left: Option<&CodemodReport>, right: Option<&CodemodReport>) -> Option<CodemodReport> {
    let (left, right) = match (left, right) {
        (None, None) => return None,
        (Some(one), None) | (None, Some(one)) => return Some(one.clone()),
        (Some(l), Some(r)) => (l, r),
    };
    let mode = if left.mode.is_empty() { right.mode.clone() } else { left.mode.clone() };
    Some(CodemodReport {
        mode,
        suggestions: merge_keyed(
            &left.suggestions,
            &right.suggestions,
            |s| (s.file.clone(), s.line, s.import_name.clone()),
            |a, b| {
                (&a.file, a.line, &a.import_name).cmp(&(&b.file, b.line, &b.import_name))
            },
        ),
        skips: merge_keyed(
            &left.skips,
            &right.skips,
            |s| (s.file.clone(), s.line, s.reason_code.clone()),
            |a, b| (&a.file, a.line, &a.reason_code).cmp(&(&b.file, b.line, &b.reason_code)),
        ),
    })
}

/// Static and runtime usage signals carried by one runtime record.
fn runtime_signals(usage: &RuntimeUsage) -> (bool, bool) {
    match usage.correlation {
        Some(RuntimeCorrelation::Overlap) => (true, true),
        Some(RuntimeCorrelation::RuntimeOnly) => (false, true),
        Some(RuntimeCorrelation::StaticOnly) => (true, false),
        None if usage.runtime_only => (false, true),
        None => (true, usage.load_count > 0),
    }
}

/// Classifies usage signals into a correlation.
#[must_use]
pub fn correlation_for(has_static: bool, has_runtime: bool) -> RuntimeCorrelation {
    match (has_static, has_runtime) {
        (true, true) => RuntimeCorrelation::Overlap,
        (false, true) => RuntimeCorrelation::RuntimeOnly,
        _ => RuntimeCorrelation::StaticOnly,
    }
}

/// Merges runtime observations; an absent side yields a copy of the other.
#[must_use]
pub fn merge_runtime_usage(left: Option<&RuntimeUsage>, right: Option<&RuntimeUsage>) -> Option<RuntimeUsage> {
    let (left, right) = match (left, right) {
        (None, None) => return None,
        (Some(one), None) | (None, Some(one)) => return Some(one.clone()),
        (Some(l), Some(r)) => (l, r),
    };

    let (left_static, left_runtime) = runtime_signals(left);
    let (right_static, right_runtime) = runtime_signals(right);
    let correlation = correlation_for(left_static || right_static, left_runtime || right_runtime);

    Some(RuntimeUsage {
        load_count: left.load_count + right.load_count,
        correlation: Some(correlation),
        runtime_only: correlation == RuntimeCorrelation::RuntimeOnly,
        modules: merge_counted(&left.modules, &right.modules, |m| m.module.clone(), None),
        top_symbols: merge_counted(
            &left.top_symbols,
            &right.top_symbols,
            |s| (s.module.clone(), s.symbol.clone()),
            Some(TOP_SYMBOLS_CAP),
        ),
    })
}

/// Merges uncertainty counters; samples from the left side are kept first.
#[must_use]
pub fn merge_usage_uncertainty(
    left: Option<&UsageUncertainty>,
    right: Option<&UsageUncertainty>,
) -> Option<UsageUncertainty> {
    let (left, right) = match (left, right) {
        (None, None) => return None,
        (Some(one), None) | (None, Some(one)) => return Some(one.clone()),
        (Some(l), Some(r)) => (l, r),
    };
    let samples: Vec<Location> = left
        .samples
        .iter()
        .chain(&right.samples)
        .take(UNCERTAINTY_SAMPLE_CAP)
        .cloned()
        .collect();
    Some(UsageUncertainty {
        confirmed_import_uses: left.confirmed_import_uses + right.confirmed_import_uses,
        uncertain_import_uses: left.uncertain_import_uses + right.uncertain_import_uses,
        samples,
    })
}
