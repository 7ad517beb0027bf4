// src/digest.rs
//! Stable SHA-256 fingerprints for file content and parameter values.

use crate::error::{LopperError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Digest recorded for a file that does not exist.
pub const MISSING_DIGEST: &str = "missing";

/// Computes the lowercase hex SHA-256 of raw bytes.
///
/// Unlike line-oriented hashing, no newline normalization happens here:
/// any byte change must change the digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Whether `s` has the shape of a [`sha256_hex`] digest: 64 lowercase hex characters.
#[must_use]
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Hashes the content of a file, returning [`MISSING_DIGEST`] if it does not exist.
///
/// # Errors
/// Returns error if the file exists but cannot be read.
pub fn hash_file(path: &Path) -> Result<String> {
    match fs::read(path) {
        Ok(bytes) => Ok(sha256_hex(&bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(MISSING_DIGEST.to_string()),
        Err(e) => Err(LopperError::io(e, path)),
    }
}

/// Hashes the canonical JSON encoding of a value.
///
/// Values pass through `serde_json::Value` first, whose maps are key-sorted,
/// so field and map ordering never affect the digest.
///
/// # Errors
/// Returns error if the value cannot be serialized.
pub fn hash_value<T: Serialize>(value: &T) -> Result<String> {
    let canonical = serde_json::to_value(value)?;
    let bytes = serde_json::to_vec(&canonical)?;
    Ok(sha256_hex(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_shape() {
        assert!(is_sha256_hex(&sha256_hex(b"lodash")));
        assert!(!is_sha256_hex("../../evil"));
        assert!(!is_sha256_hex(&sha256_hex(b"x").to_uppercase()));
        assert!(!is_sha256_hex(MISSING_DIGEST));
    }

    #[test]
    fn test_same_content_same_digest() -> Result<()> {
        let temp = TempDir::new()?;
        let a = temp.path().join("a.js");
        let b = temp.path().join("b.js");
        fs::write(&a, "import x from 'lodash';\n")?;
        fs::write(&b, "import x from 'lodash';\n")?;
        assert_eq!(hash_file(&a)?, hash_file(&b)?);
        assert_eq!(hash_file(&a)?, hash_file(&a)?);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_sentinel() -> Result<()> {
        let temp = TempDir::new()?;
        let digest = hash_file(&temp.path().join("nope.toml"))?;
        assert_eq!(digest, MISSING_DIGEST);
        Ok(())
    }

    #[test]
    fn test_line_endings_are_significant() {
        assert_ne!(sha256_hex(b"a\r\nb"), sha256_hex(b"a\nb"));
    }

    #[test]
    fn test_value_digest_ignores_map_order() -> Result<()> {
        let mut first = HashMap::new();
        first.insert("topN", 10);
        first.insert("alpha", 1);
        let mut second = HashMap::new();
        second.insert("alpha", 1);
        second.insert("topN", 10);
        assert_eq!(hash_value(&first)?, hash_value(&second)?);
        Ok(())
    }
}
