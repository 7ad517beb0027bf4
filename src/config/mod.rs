// src/config/mod.rs
pub mod types;

pub use self::types::{CacheSection, LopperToml, ThresholdOverrides, Thresholds, WeightOverrides};

use crate::cache::CacheOptions;
use crate::error::{LopperError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the optional per-repository config file.
pub const CONFIG_FILE: &str = "lopper.toml";

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub cache: CacheOptions,
    pub thresholds: Thresholds,
    /// Config file that contributed to this configuration, if any.
    pub config_path: Option<PathBuf>,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `lopper.toml` from the repository root, if present.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(repo: &Path) -> Result<Self> {
        Self::load_from(&repo.join(CONFIG_FILE))
    }

    /// Loads configuration from an explicit path. A missing file yields defaults
    /// but is still remembered as the config path, so creating it later
    /// invalidates cached results.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::new();
        config.config_path = Some(path.to_path_buf());
        match fs::read_to_string(path) {
            Ok(content) => config.parse_toml(&content, path)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(LopperError::io(e, path)),
        }
        Ok(config)
    }

    /// Applies the content of a `lopper.toml` on top of the current values.
    ///
    /// # Errors
    /// Returns error if the content is not valid TOML for this schema.
    pub fn parse_toml(&mut self, content: &str, path: &Path) -> Result<()> {
        let parsed: LopperToml = toml::from_str(content).map_err(|source| LopperError::Toml {
            source,
            path: path.to_path_buf(),
        })?;
        self.cache = CacheOptions {
            enabled: parsed.cache.enabled,
            path: parsed.cache.path,
            read_only: parsed.cache.read_only,
        };
        self.thresholds = self.thresholds.with_overrides(&parsed.thresholds);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let config = Config::load(temp.path())?;
        assert!(config.cache.enabled);
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.config_path, Some(temp.path().join(CONFIG_FILE)));
        Ok(())
    }

    #[test]
    fn test_partial_weight_override() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(
            temp.path().join(CONFIG_FILE),
            "[cache]\nread_only = true\n\n[thresholds.removal_candidate_weights]\nusage = 0.7\n",
        )?;
        let config = Config::load(temp.path())?;
        assert!(config.cache.read_only);
        let weights = config.thresholds.removal_candidate_weights;
        assert!((weights.usage - 0.7).abs() < f64::EPSILON);
        assert!((weights.impact - 0.3).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_error() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join(CONFIG_FILE), "[cache\nenabled = ")?;
        assert!(matches!(
            Config::load(temp.path()),
            Err(LopperError::Toml { .. })
        ));
        Ok(())
    }
}
