// src/error.rs
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LopperError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Temp file creation; the message already names the path.
    #[error("Temp file error: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config {path}: {source}")]
    Toml {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("Walk error: {0}")]
    Walk(String),

    #[error("Analyzer '{adapter}' failed on {root}: {message}")]
    Analyzer {
        adapter: String,
        root: PathBuf,
        message: String,
    },

    #[error("Generic error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LopperError>;

impl LopperError {
    /// Wraps an I/O error with the path it happened on.
    #[must_use]
    pub fn io(source: std::io::Error, path: &Path) -> Self {
        Self::Io {
            source,
            path: path.to_path_buf(),
        }
    }
}

// Allow `?` on std::io::Error by converting to LopperError::Io with unknown path.
impl From<std::io::Error> for LopperError {
    fn from(source: std::io::Error) -> Self {
        LopperError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Walk errors carry the offending path in their message already.
impl From<walkdir::Error> for LopperError {
    fn from(e: walkdir::Error) -> Self {
        LopperError::Walk(e.to_string())
    }
}
