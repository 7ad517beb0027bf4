// src/report/mod.rs
pub mod types;

pub use self::types::{
    used_percent, CodemodReport, CodemodSkip, CodemodSuggestion, DependencyReport,
    FindingConfidence, ImportUse, LanguageSummary, Location, Priority, Recommendation,
    RemovalCandidate, RemovalCandidateWeights, Report, RiskCue, RuntimeCorrelation,
    RuntimeModuleUsage, RuntimeSymbolUsage, RuntimeUsage, Severity, Summary, SymbolRef,
    SymbolUsage, UsageUncertainty, REPORT_SCHEMA_VERSION,
};

use std::collections::BTreeMap;
use std::path::{Component, Path};

impl Report {
    /// Creates an empty report for a repository.
    #[must_use]
    pub fn new(repo_path: &str) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            repo_path: repo_path.to_string(),
            ..Self::default()
        }
    }

    /// Recomputes `summary` and `language_breakdown` from the dependency list.
    pub fn refresh_summary(&mut self) {
        let (summary, breakdown) = summarize(&self.dependencies);
        self.summary = Some(summary);
        self.language_breakdown = breakdown;
    }
}

/// Aggregates counts over the dependency list, overall and per language.
#[must_use]
pub fn summarize(dependencies: &[DependencyReport]) -> (Summary, Vec<LanguageSummary>) {
    let mut summary = Summary::default();
    let mut by_language: BTreeMap<&str, LanguageSummary> = BTreeMap::new();

    for dep in dependencies {
        summary.dependency_count += 1;
        summary.used_exports_count += dep.used_exports_count;
        summary.total_exports_count += dep.total_exports_count;

        let entry = by_language
            .entry(dep.language.as_str())
            .or_insert_with(|| LanguageSummary {
                language: dep.language.clone(),
                ..LanguageSummary::default()
            });
        entry.dependency_count += 1;
        entry.used_exports_count += dep.used_exports_count;
        entry.total_exports_count += dep.total_exports_count;
    }

    summary.used_percent = used_percent(summary.used_exports_count, summary.total_exports_count);
    let breakdown = by_language
        .into_values()
        .map(|mut lang| {
            lang.used_percent = used_percent(lang.used_exports_count, lang.total_exports_count);
            lang
        })
        .collect();

    (summary, breakdown)
}

/// Rewrites file paths inside a partial report from root-relative to repo-relative.
///
/// Absolute paths under `repo` are made relative to it; paths outside the
/// repository are left untouched.
pub fn rebase_report_paths(report: &mut Report, root: &Path, repo: &Path) {
    let prefix = root.strip_prefix(repo).ok().map(path_to_slash);

    let rebase = |file: &mut String| {
        let rebased = rebase_one(file, prefix.as_deref(), repo);
        *file = rebased;
    };

    for dep in &mut report.dependencies {
        for import in dep.used_imports.iter_mut().chain(dep.unused_imports.iter_mut()) {
            for loc in &mut import.locations {
                rebase(&mut loc.file);
            }
        }
        if let Some(codemod) = dep.codemod.as_mut() {
            for suggestion in &mut codemod.suggestions {
                rebase(&mut suggestion.file);
            }
            for skip in &mut codemod.skips {
                rebase(&mut skip.file);
            }
        }
    }

    if let Some(uncertainty) = report.usage_uncertainty.as_mut() {
        for sample in &mut uncertainty.samples {
            rebase(&mut sample.file);
        }
    }
}

fn rebase_one(file: &str, prefix: Option<&str>, repo: &Path) -> String {
    let path = Path::new(file);
    if path.is_absolute() {
        return match path.strip_prefix(repo) {
            Ok(rel) => path_to_slash(rel),
            Err(_) => file.to_string(),
        };
    }
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}/{}", file.replace('\\', "/")),
        _ => file.replace('\\', "/"),
    }
}

fn path_to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(language: &str, name: &str, used: u64, total: u64) -> DependencyReport {
        DependencyReport {
            used_exports_count: used,
            total_exports_count: total,
            ..DependencyReport::new(language, name)
        }
    }

    #[test]
    fn test_summary_counts_per_language() {
        let deps = vec![
            dep("js-ts", "lodash", 3, 5),
            dep("python", "requests", 1, 4),
            dep("js-ts", "react", 1, 5),
        ];
        let (summary, breakdown) = summarize(&deps);
        assert_eq!(summary.dependency_count, 3);
        assert_eq!(summary.used_exports_count, 5);
        assert_eq!(summary.total_exports_count, 14);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].language, "js-ts");
        assert_eq!(breakdown[0].dependency_count, 2);
        assert!((breakdown[0].used_percent - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rebase_relative_paths_under_root() {
        let mut report = Report::new("/repo");
        let mut d = dep("js-ts", "lodash", 1, 2);
        d.used_imports.push(ImportUse {
            name: "map".into(),
            module: "lodash".into(),
            locations: vec![Location {
                file: "src/index.js".into(),
                line: 3,
                column: 1,
            }],
            ..ImportUse::default()
        });
        report.dependencies.push(d);

        rebase_report_paths(&mut report, Path::new("/repo/packages/web"), Path::new("/repo"));
        let loc = &report.dependencies[0].used_imports[0].locations[0];
        assert_eq!(loc.file, "packages/web/src/index.js");
    }

    #[test]
    fn test_rebase_absolute_paths() {
        assert_eq!(
            rebase_one("/repo/a/b.py", Some("a"), Path::new("/repo")),
            "a/b.py"
        );
        assert_eq!(
            rebase_one("/elsewhere/b.py", Some("a"), Path::new("/repo")),
            "/elsewhere/b.py"
        );
        assert_eq!(rebase_one("b.py", Some(""), Path::new("/repo")), "b.py");
    }
}
