// src/request.rs
use crate::cache::CacheOptions;
use crate::config::{Config, Thresholds};
use std::path::{Path, PathBuf};

/// Parameters of one analysis run, as handed to the language adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub repo_path: PathBuf,
    /// Restricts analysis to a single dependency.
    pub dependency: Option<String>,
    /// Number of dependencies to rank; 0 means all.
    pub top_n: usize,
    pub scope_mode: String,
    pub runtime_profile: String,
    pub thresholds: Thresholds,
    pub config_path: Option<PathBuf>,
    pub cache: CacheOptions,
}

impl AnalysisRequest {
    #[must_use]
    pub fn new(repo_path: &Path) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
            dependency: None,
            top_n: 0,
            scope_mode: "package".to_string(),
            runtime_profile: "node-import".to_string(),
            thresholds: Thresholds::default(),
            config_path: None,
            cache: CacheOptions::default(),
        }
    }

    /// Builds a request whose thresholds and cache settings come from `config`.
    #[must_use]
    pub fn from_config(repo_path: &Path, config: &Config) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
            config_path: config.config_path.clone(),
            cache: config.cache.clone(),
            ..Self::new(repo_path)
        }
    }
}
