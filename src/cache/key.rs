// src/cache/key.rs
//! Cache key derivation.
//!
//! The key digest covers *how* an analysis runs (adapter, root, parameters);
//! the input digest covers *what* it runs on (relevant files and config).

use crate::digest::{hash_file, hash_value, sha256_hex};
use crate::error::Result;
use crate::request::AnalysisRequest;
use crate::walker::collect_relevant_files;
use serde::Serialize;
use std::path::Path;

/// Bumped whenever the cached payload or key layout changes.
pub const CACHE_SCHEMA_VERSION: &str = "1";

const CONFIG_RECORD: &str = "lopper-config";

/// Identifies one cached analysis. The default value is the empty key,
/// which every cache operation treats as a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKey {
    pub key_digest: String,
    pub input_digest: String,
}

impl CacheKey {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_digest.is_empty()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyMaterial<'a> {
    schema_version: &'a str,
    adapter: &'a str,
    root: String,
    dependency: Option<&'a str>,
    top_n: usize,
    scope_mode: &'a str,
    runtime_profile: &'a str,
    thresholds: &'a crate::config::Thresholds,
    config_path: Option<String>,
}

/// Hashes every request field that changes analysis semantics.
///
/// # Errors
/// Returns error if the key material cannot be serialized.
pub fn key_digest(request: &AnalysisRequest, adapter_id: &str, root: &Path) -> Result<String> {
    let material = KeyMaterial {
        schema_version: CACHE_SCHEMA_VERSION,
        adapter: adapter_id,
        root: normalize_root(root),
        dependency: request.dependency.as_deref(),
        top_n: request.top_n,
        scope_mode: &request.scope_mode,
        runtime_profile: &request.runtime_profile,
        thresholds: &request.thresholds,
        config_path: request.config_path.as_deref().map(normalize_root),
    };
    hash_value(&material)
}

/// Hashes the sorted file records under `root` plus the config file record.
///
/// # Errors
/// Returns error if a relevant file exists but cannot be read.
pub fn input_digest(root: &Path, config_path: Option<&Path>) -> Result<String> {
    let mut lines: Vec<String> = collect_relevant_files(root)?
        .iter()
        .map(|r| r.record_line())
        .collect();

    if let Some(path) = config_path {
        lines.push(format!("{CONFIG_RECORD}\0{}", hash_file(path)?));
    }

    lines.sort();
    Ok(sha256_hex(lines.join("\n").as_bytes()))
}

/// Absolute, symlink-resolved form of a path when it exists; as given otherwise.
fn normalize_root(path: &Path) -> String {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    resolved.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_key_digest_tracks_parameters() -> Result<()> {
        let temp = TempDir::new()?;
        let request = AnalysisRequest::new(temp.path());
        let base = key_digest(&request, "js-ts", temp.path())?;
        assert_eq!(base, key_digest(&request, "js-ts", temp.path())?);
        assert_ne!(base, key_digest(&request, "python", temp.path())?);

        let mut filtered = request.clone();
        filtered.dependency = Some("lodash".into());
        assert_ne!(base, key_digest(&filtered, "js-ts", temp.path())?);

        let mut weighted = request.clone();
        weighted.thresholds.removal_candidate_weights.usage = 0.9;
        assert_ne!(base, key_digest(&weighted, "js-ts", temp.path())?);
        Ok(())
    }

    #[test]
    fn test_key_digest_ignores_content() -> Result<()> {
        let temp = TempDir::new()?;
        let request = AnalysisRequest::new(temp.path());
        let before = key_digest(&request, "go", temp.path())?;
        fs::write(temp.path().join("main.go"), "package main")?;
        assert_eq!(before, key_digest(&request, "go", temp.path())?);
        Ok(())
    }

    #[test]
    fn test_input_digest_tracks_content_and_config() -> Result<()> {
        let temp = TempDir::new()?;
        let root = temp.path();
        fs::write(root.join("main.go"), "package main")?;
        let config = root.join("lopper.toml");

        let missing = input_digest(root, Some(&config))?;
        assert_eq!(missing, input_digest(root, Some(&config))?);

        fs::write(&config, "[cache]\n")?;
        let with_config = input_digest(root, Some(&config))?;
        assert_ne!(missing, with_config);

        fs::write(root.join("main.go"), "package main\n")?;
        assert_ne!(with_config, input_digest(root, Some(&config))?);
        Ok(())
    }
}
