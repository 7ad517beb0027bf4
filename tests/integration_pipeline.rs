// tests/integration_pipeline.rs
//! Full runs: adapters over roots, through the cache, into one scored report.

use anyhow::Result;
use lopper_core::cache::CacheOptions;
use lopper_core::error::LopperError;
use lopper_core::pipeline::{run, AdapterRun, Analyzer};
use lopper_core::report::{DependencyReport, ImportUse, Location, Report};
use lopper_core::request::AnalysisRequest;
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Reports `lodash` with one use per `.js` file found directly in `src/`.
struct FakeJsAnalyzer {
    calls: Cell<usize>,
}

impl FakeJsAnalyzer {
    fn new() -> Self {
        Self { calls: Cell::new(0) }
    }
}

impl Analyzer for FakeJsAnalyzer {
    fn id(&self) -> &str {
        "js-ts"
    }

    fn analyze(&self, _request: &AnalysisRequest, root: &Path) -> lopper_core::error::Result<Report> {
        self.calls.set(self.calls.get() + 1);
        let files = fs::read_dir(root.join("src"))
            .map_err(|e| LopperError::io(e, root))?
            .filter_map(std::result::Result::ok)
            .count() as u64;

        let mut dep = DependencyReport::new("js-ts", "lodash");
        dep.used_exports_count = files;
        dep.total_exports_count = 10;
        dep.recompute_used_percent();
        dep.used_imports.push(ImportUse {
            name: "map".into(),
            module: "lodash".into(),
            locations: vec![Location { file: "src/index.js".into(), line: 1, column: 1 }],
            ..ImportUse::default()
        });

        let mut report = Report::new("");
        report.dependencies.push(dep);
        Ok(report)
    }
}

struct FailingAnalyzer;

impl Analyzer for FailingAnalyzer {
    fn id(&self) -> &str {
        "python"
    }

    fn analyze(&self, _request: &AnalysisRequest, root: &Path) -> lopper_core::error::Result<Report> {
        Err(LopperError::Analyzer {
            adapter: "python".into(),
            root: root.to_path_buf(),
            message: "interpreter not found".into(),
        })
    }
}

/// Two JS packages under one repository.
fn create_monorepo() -> Result<TempDir> {
    let repo = TempDir::new()?;
    for pkg in ["packages/web", "packages/api"] {
        let root = repo.path().join(pkg);
        fs::create_dir_all(root.join("src"))?;
        fs::write(root.join("package.json"), "{}")?;
        fs::write(root.join("src/index.js"), "import { map } from 'lodash';\n")?;
    }
    fs::write(repo.path().join("packages/api/src/extra.js"), "import 'lodash';\n")?;
    Ok(repo)
}

fn roots(repo: &Path) -> Vec<std::path::PathBuf> {
    vec![repo.join("packages/web"), repo.join("packages/api")]
}

#[test]
fn test_second_run_reuses_cache() -> Result<()> {
    let repo = create_monorepo()?;
    let analyzer = FakeJsAnalyzer::new();
    let request = AnalysisRequest::new(repo.path());
    let runs = [AdapterRun { analyzer: &analyzer, roots: roots(repo.path()) }];

    let (first, stats) = run(&request, &runs)?;
    assert_eq!(stats.analyzed, 2);
    assert_eq!(first.cache.as_ref().map(|c| c.writes), Some(2));

    let (second, stats) = run(&request, &runs)?;
    assert_eq!(stats.reused, 2);
    assert_eq!(stats.analyzed, 0);
    assert_eq!(analyzer.calls.get(), 2);
    let meta = second.cache.clone().unwrap_or_default();
    assert_eq!((meta.hits, meta.misses, meta.writes), (2, 0, 0));

    // Cached and fresh runs produce the same findings.
    assert_eq!(first.dependencies, second.dependencies);
    Ok(())
}

#[test]
fn test_merged_report_is_rebased_and_scored() -> Result<()> {
    let repo = create_monorepo()?;
    let analyzer = FakeJsAnalyzer::new();
    let request = AnalysisRequest::new(repo.path());
    let (report, _) = run(&request, &[AdapterRun { analyzer: &analyzer, roots: roots(repo.path()) }])?;

    assert_eq!(report.dependencies.len(), 1);
    let lodash = &report.dependencies[0];
    assert_eq!(lodash.used_exports_count, 3);
    assert_eq!(lodash.total_exports_count, 20);
    assert!((lodash.used_percent - 15.0).abs() < 1e-9);
    assert!(lodash.removal_candidate.is_some());
    assert!(lodash.confidence.is_some());

    let files: Vec<_> = lodash.used_imports[0]
        .locations
        .iter()
        .map(|l| l.file.as_str())
        .collect();
    assert_eq!(files, vec!["packages/web/src/index.js", "packages/api/src/index.js"]);
    assert!(report.summary.is_some());
    Ok(())
}

#[test]
fn test_source_change_reanalyzes_only_that_root() -> Result<()> {
    let repo = create_monorepo()?;
    let analyzer = FakeJsAnalyzer::new();
    let request = AnalysisRequest::new(repo.path());
    let runs = [AdapterRun { analyzer: &analyzer, roots: roots(repo.path()) }];
    run(&request, &runs)?;

    fs::write(repo.path().join("packages/web/src/new.js"), "import 'lodash';\n")?;
    let (report, stats) = run(&request, &runs)?;
    assert_eq!((stats.analyzed, stats.reused), (1, 1));
    let meta = report.cache.unwrap_or_default();
    assert_eq!(meta.invalidations.len(), 1);
    assert_eq!(meta.invalidations[0].reason.code(), "input-changed");
    assert_eq!(report.dependencies[0].used_exports_count, 4);
    Ok(())
}

#[test]
fn test_unusable_cache_degrades_to_warning() -> Result<()> {
    let repo = create_monorepo()?;
    let blocker = repo.path().join("not-a-dir");
    fs::write(&blocker, "file")?;

    let analyzer = FakeJsAnalyzer::new();
    let mut request = AnalysisRequest::new(repo.path());
    request.cache = CacheOptions {
        path: Some(blocker.join("cache")),
        ..CacheOptions::default()
    };
    let (report, stats) = run(&request, &[AdapterRun { analyzer: &analyzer, roots: roots(repo.path()) }])?;

    assert_eq!(stats.analyzed, 2);
    assert_eq!(report.dependencies.len(), 1);
    let meta = report.cache.clone().unwrap_or_default();
    assert!(!meta.enabled);
    assert_eq!(meta.writes, 0);
    let cache_warnings = report
        .warnings
        .iter()
        .filter(|w| w.contains("analysis cache disabled"))
        .count();
    assert_eq!(cache_warnings, 1);
    Ok(())
}

#[test]
fn test_disabled_cache_always_analyzes() -> Result<()> {
    let repo = create_monorepo()?;
    let analyzer = FakeJsAnalyzer::new();
    let mut request = AnalysisRequest::new(repo.path());
    request.cache.enabled = false;
    let runs = [AdapterRun { analyzer: &analyzer, roots: roots(repo.path()) }];
    run(&request, &runs)?;
    run(&request, &runs)?;
    assert_eq!(analyzer.calls.get(), 4);
    assert!(!repo.path().join(".lopper-cache").exists());
    Ok(())
}

#[test]
fn test_analyzer_failure_propagates() -> Result<()> {
    let repo = create_monorepo()?;
    let request = AnalysisRequest::new(repo.path());
    let result = run(&request, &[AdapterRun { analyzer: &FailingAnalyzer, roots: vec![repo.path().to_path_buf()] }]);
    assert!(matches!(result, Err(LopperError::Analyzer { .. })));
    Ok(())
}
