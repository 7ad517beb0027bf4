// tests/unit_config.rs
use lopper_core::config::{Config, Thresholds, CONFIG_FILE};
use lopper_core::request::AnalysisRequest;
use lopper_core::scoring::DEFAULT_REMOVAL_CANDIDATE_WEIGHTS;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_defaults() {
    let t = Thresholds::default();
    assert_eq!(t.low_confidence_warning_percent, 40.0);
    assert_eq!(t.min_usage_percent_for_recommendations, 40.0);
    assert_eq!(t.removal_candidate_weights, DEFAULT_REMOVAL_CANDIDATE_WEIGHTS);
}

#[test]
fn test_load_toml() {
    let d = tempfile::tempdir().unwrap();
    fs::write(
        d.path().join(CONFIG_FILE),
        "[cache]\npath = \"tmp/cache\"\n\n[thresholds]\nlow_confidence_warning_percent = 55\n",
    )
    .unwrap();
    let c = Config::load(d.path()).unwrap();
    assert_eq!(c.cache.path, Some(PathBuf::from("tmp/cache")));
    assert_eq!(c.cache.resolve_path(d.path()), d.path().join("tmp/cache"));
    assert_eq!(c.thresholds.low_confidence_warning_percent, 55.0);
    assert_eq!(c.thresholds.fail_on_increase_percent, 0.0);
}

#[test]
fn test_cache_disabled() {
    let d = tempfile::tempdir().unwrap();
    fs::write(d.path().join(CONFIG_FILE), "[cache]\nenabled = false\n").unwrap();
    let c = Config::load(d.path()).unwrap();
    assert!(!c.cache.enabled);
}

#[test]
fn test_request_from_config() {
    let d = tempfile::tempdir().unwrap();
    fs::write(
        d.path().join(CONFIG_FILE),
        "[thresholds.removal_candidate_weights]\nusage = 1\nimpact = 1\nconfidence = 1\n",
    )
    .unwrap();
    let c = Config::load(d.path()).unwrap();
    let r = AnalysisRequest::from_config(d.path(), &c);
    assert_eq!(r.config_path, Some(d.path().join(CONFIG_FILE)));
    assert_eq!(r.thresholds.removal_candidate_weights.impact, 1.0);
    assert!(r.cache.enabled);
}
