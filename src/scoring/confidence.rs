// src/scoring/confidence.rs
//! Finding-level confidence: one score per dependency, copied onto each of
//! its findings together with the reasons that lowered it.

use super::assess_penalties;
use crate::report::{DependencyReport, FindingConfidence};

/// Scores every dependency and stamps the result on its findings
/// (unused imports and exports, risk cues, recommendations).
pub fn annotate_finding_confidence(dependencies: &mut [DependencyReport]) {
    for dep in dependencies {
        let assessment = assess_penalties(dep);
        let score = assessment.score();
        let codes: Vec<String> = assessment.reason_codes.iter().map(|c| (*c).to_string()).collect();

        for import in &mut dep.unused_imports {
            import.confidence_score = Some(score);
            import.confidence_reason_codes.clone_from(&codes);
        }
        for export in &mut dep.unused_exports {
            export.confidence_score = Some(score);
            export.confidence_reason_codes.clone_from(&codes);
        }
        for cue in &mut dep.risk_cues {
            cue.confidence_score = Some(score);
            cue.confidence_reason_codes.clone_from(&codes);
        }
        for rec in &mut dep.recommendations {
            rec.confidence_score = Some(score);
            rec.confidence_reason_codes.clone_from(&codes);
        }

        dep.confidence = Some(FindingConfidence { score, reason_codes: codes });
    }
}

/// Warnings for dependencies whose confidence falls below `threshold`.
///
/// Must run after [`annotate_finding_confidence`]; unscored dependencies are skipped.
#[must_use]
pub fn low_confidence_warnings(dependencies: &[DependencyReport], threshold: f64) -> Vec<String> {
    dependencies
        .iter()
        .filter_map(|dep| {
            let confidence = dep.confidence.as_ref()?;
            (confidence.score < threshold).then(|| {
                format!(
                    "low confidence findings for {}/{} (score {:.1}: {})",
                    dep.language,
                    dep.name,
                    confidence.score,
                    confidence.reason_codes.join(", ")
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ImportUse, Recommendation, RiskCue, Severity, SymbolRef};
    use crate::scoring::{REASON_MISSING_INVENTORY, REASON_RISK_MEDIUM};

    fn noisy_dependency() -> DependencyReport {
        let mut dep = DependencyReport::new("python", "requests");
        dep.unused_imports.push(ImportUse {
            name: "Session".into(),
            module: "requests".into(),
            ..ImportUse::default()
        });
        dep.unused_exports.push(SymbolRef {
            name: "get".into(),
            module: "requests".into(),
            ..SymbolRef::default()
        });
        dep.risk_cues.push(RiskCue {
            code: "dynamic-import".into(),
            severity: Severity::Medium,
            ..RiskCue::default()
        });
        dep.recommendations.push(Recommendation {
            code: "remove-unused".into(),
            ..Recommendation::default()
        });
        dep
    }

    #[test]
    fn test_every_finding_is_stamped() {
        let mut deps = vec![noisy_dependency()];
        annotate_finding_confidence(&mut deps);
        let dep = &deps[0];
        let expected = vec![REASON_MISSING_INVENTORY.to_string(), REASON_RISK_MEDIUM.to_string()];

        assert_eq!(dep.unused_imports[0].confidence_score, Some(53.0));
        assert_eq!(dep.unused_exports[0].confidence_reason_codes, expected);
        assert_eq!(dep.risk_cues[0].confidence_score, Some(53.0));
        assert_eq!(dep.recommendations[0].confidence_reason_codes, expected);
        assert_eq!(dep.confidence.as_ref().map(|c| c.score), Some(53.0));
    }

    #[test]
    fn test_idempotent() {
        let mut deps = vec![noisy_dependency()];
        annotate_finding_confidence(&mut deps);
        let once = deps.clone();
        annotate_finding_confidence(&mut deps);
        assert_eq!(once, deps);
    }

    #[test]
    fn test_recomputes_after_data_changes() {
        let mut deps = vec![noisy_dependency()];
        annotate_finding_confidence(&mut deps);
        deps[0].total_exports_count = 4;
        deps[0].risk_cues.clear();
        annotate_finding_confidence(&mut deps);
        assert_eq!(deps[0].unused_exports[0].confidence_score, Some(100.0));
        assert!(deps[0].unused_exports[0].confidence_reason_codes.is_empty());
    }

    #[test]
    fn test_low_confidence_warning_threshold() {
        let mut deps = vec![noisy_dependency()];
        annotate_finding_confidence(&mut deps);
        assert_eq!(low_confidence_warnings(&deps, 40.0).len(), 0);
        let warnings = low_confidence_warnings(&deps, 60.0);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("python/requests"));
    }
}
