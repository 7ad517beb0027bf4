// src/cache/mod.rs
//! Content-addressed result cache for per-root analyses.
//!
//! Layout under the cache root:
//!
//! ```text
//! keys/<keyDigest>.json       {"inputDigest": "...", "objectDigest": "..."}
//! objects/<objectDigest>.json {"report": {...}}
//! ```
//!
//! A pointer records which input it was computed from and which object holds
//! the result. Objects are immutable and named by the digest of their bytes.
//! No cache fault is ever returned to callers from [`AnalysisCache::lookup`]:
//! every problem degrades to a miss.

pub mod key;
pub mod store;

pub use self::key::{CacheKey, CACHE_SCHEMA_VERSION};

use crate::digest::{is_sha256_hex, sha256_hex};
use crate::error::{LopperError, Result};
use crate::report::Report;
use crate::request::AnalysisRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default cache directory name, relative to the repository root.
pub const DEFAULT_CACHE_DIR: &str = ".lopper-cache";

const KEYS_DIR: &str = "keys";
const OBJECTS_DIR: &str = "objects";

/// User-facing cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    pub enabled: bool,
    /// Cache root; relative paths resolve against the repository.
    pub path: Option<PathBuf>,
    /// Serve hits but never write.
    pub read_only: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { enabled: true, path: None, read_only: false }
    }
}

impl CacheOptions {
    /// Resolves the cache root for a repository.
    #[must_use]
    pub fn resolve_path(&self, repo: &Path) -> PathBuf {
        match &self.path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => repo.join(p),
            None => repo.join(DEFAULT_CACHE_DIR),
        }
    }
}

/// Why a lookup missed although a pointer existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidationReason {
    PointerCorrupt,
    InputChanged,
    ObjectMissing,
    ObjectCorrupt,
}

impl InvalidationReason {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::PointerCorrupt => "pointer-corrupt",
            Self::InputChanged => "input-changed",
            Self::ObjectMissing => "object-missing",
            Self::ObjectCorrupt => "object-corrupt",
        }
    }
}

impl fmt::Display for InvalidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInvalidation {
    pub key: String,
    pub reason: InvalidationReason,
}

/// Snapshot of cache state and counters for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    pub enabled: bool,
    pub path: String,
    pub read_only: bool,
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalidations: Vec<CacheInvalidation>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachePointer {
    input_digest: String,
    object_digest: String,
}

#[derive(Serialize)]
struct CacheObjectRef<'a> {
    report: &'a Report,
}

#[derive(Deserialize)]
struct CacheObject {
    report: Report,
}

/// Per-invocation handle to the on-disk cache.
#[derive(Debug)]
pub struct AnalysisCache {
    root: PathBuf,
    enabled: bool,
    usable: bool,
    read_only: bool,
    hits: u64,
    misses: u64,
    writes: u64,
    invalidations: Vec<CacheInvalidation>,
    warnings: Vec<String>,
}

impl AnalysisCache {
    /// Opens the cache for a repository.
    ///
    /// Failing to create the cache directories disables the cache for this
    /// run and queues a warning; it is never an error.
    #[must_use]
    pub fn new(options: &CacheOptions, repo: &Path) -> Self {
        let mut cache = Self {
            root: options.resolve_path(repo),
            enabled: options.enabled,
            usable: options.enabled,
            read_only: options.read_only,
            hits: 0,
            misses: 0,
            writes: 0,
            invalidations: Vec::new(),
            warnings: Vec::new(),
        };

        if cache.enabled && !cache.read_only {
            if let Err(e) = cache.create_dirs() {
                tracing::warn!(path = %cache.root.display(), error = %e, "analysis cache disabled");
                cache.usable = false;
                cache
                    .warnings
                    .push(format!("analysis cache disabled: {e}"));
            }
        }
        cache
    }

    fn create_dirs(&self) -> Result<()> {
        store::create_private_dir(&self.root.join(KEYS_DIR))?;
        store::create_private_dir(&self.root.join(OBJECTS_DIR))
    }

    fn active(&self) -> bool {
        self.enabled && self.usable
    }

    /// Computes the cache key for analyzing `root` with `adapter_id`.
    ///
    /// Returns the empty key when the cache is inactive.
    ///
    /// # Errors
    /// Returns error if a relevant file under `root` exists but cannot be read:
    /// an input digest over partial content cannot be trusted.
    pub fn prepare(&self, request: &AnalysisRequest, adapter_id: &str, root: &Path) -> Result<CacheKey> {
        if !self.active() {
            return Ok(CacheKey::default());
        }
        Ok(CacheKey {
            key_digest: key::key_digest(request, adapter_id, root)?,
            input_digest: key::input_digest(root, request.config_path.as_deref())?,
        })
    }

    /// Returns the cached report for `key`, or `None` on a miss.
    pub fn lookup(&mut self, key: &CacheKey) -> Option<Report> {
        if !self.active() || key.is_empty() {
            return None;
        }

        match self.try_lookup(key) {
            Ok(Lookup::Hit(report)) => {
                self.hits += 1;
                tracing::debug!(key = %key.key_digest, "analysis cache hit");
                Some(*report)
            }
            Ok(Lookup::Miss) => {
                self.misses += 1;
                tracing::debug!(key = %key.key_digest, "analysis cache miss");
                None
            }
            Ok(Lookup::Invalid(reason)) => {
                self.misses += 1;
                tracing::debug!(key = %key.key_digest, %reason, "analysis cache entry invalidated");
                self.invalidations.push(CacheInvalidation {
                    key: key.key_digest.clone(),
                    reason,
                });
                None
            }
            Err(e) => {
                self.misses += 1;
                tracing::warn!(key = %key.key_digest, error = %e, "analysis cache lookup failed");
                self.warnings.push(format!("analysis cache lookup failed: {e}"));
                None
            }
        }
    }

    fn try_lookup(&self, key: &CacheKey) -> Result<Lookup> {
        let pointer_path = self.pointer_path(&key.key_digest);
        let Some(raw) = read_optional(&pointer_path)? else {
            return Ok(Lookup::Miss);
        };
        let Ok(pointer) = serde_json::from_slice::<CachePointer>(&raw) else {
            return Ok(Lookup::Invalid(InvalidationReason::PointerCorrupt));
        };
        // The object digest becomes a file name, so anything else is corrupt.
        if !is_sha256_hex(&pointer.object_digest) {
            return Ok(Lookup::Invalid(InvalidationReason::PointerCorrupt));
        }
        if pointer.input_digest != key.input_digest {
            return Ok(Lookup::Invalid(InvalidationReason::InputChanged));
        }

        let object_path = self.object_path(&pointer.object_digest);
        let Some(raw) = read_optional(&object_path)? else {
            return Ok(Lookup::Invalid(InvalidationReason::ObjectMissing));
        };
        match serde_json::from_slice::<CacheObject>(&raw) {
            Ok(object) => Ok(Lookup::Hit(Box::new(object.report))),
            Err(_) => Ok(Lookup::Invalid(InvalidationReason::ObjectCorrupt)),
        }
    }

    /// Persists `report` under `key`.
    ///
    /// An existing object is kept only if its bytes match; a damaged one is
    /// rewritten. The pointer is always rewritten. Does nothing for an inactive or
    /// read-only cache or an empty key.
    ///
    /// # Errors
    /// Returns error if serialization or either write fails.
    pub fn store(&mut self, key: &CacheKey, report: &Report) -> Result<()> {
        if !self.active() || self.read_only || key.is_empty() {
            return Ok(());
        }

        let bytes = serde_json::to_vec(&CacheObjectRef { report })?;
        let object_digest = sha256_hex(&bytes);
        let object_path = self.object_path(&object_digest);
        let intact = matches!(fs::read(&object_path), Ok(existing) if existing == bytes);
        if !intact {
            store::write_atomic(&object_path, &bytes)?;
        }

        let pointer = CachePointer {
            input_digest: key.input_digest.clone(),
            object_digest,
        };
        store::write_atomic(&self.pointer_path(&key.key_digest), &serde_json::to_vec(&pointer)?)?;
        self.writes += 1;
        tracing::debug!(key = %key.key_digest, object = %pointer.object_digest, "analysis cache write");
        Ok(())
    }

    /// Records a store failure as a warning instead of failing the run.
    pub fn store_or_warn(&mut self, key: &CacheKey, report: &Report) {
        if let Err(e) = self.store(key, report) {
            tracing::warn!(key = %key.key_digest, error = %e, "analysis cache write failed");
            self.warnings.push(format!("analysis cache write failed: {e}"));
        }
    }

    /// Returns queued warnings, leaving the queue empty.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    #[must_use]
    pub fn metadata(&self) -> CacheMetadata {
        CacheMetadata {
            enabled: self.active(),
            path: self.root.to_string_lossy().into_owned(),
            read_only: self.read_only,
            hits: self.hits,
            misses: self.misses,
            writes: self.writes,
            invalidations: self.invalidations.clone(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pointer_path(&self, key_digest: &str) -> PathBuf {
        self.root.join(KEYS_DIR).join(format!("{key_digest}.json"))
    }

    fn object_path(&self, object_digest: &str) -> PathBuf {
        self.root.join(OBJECTS_DIR).join(format!("{object_digest}.json"))
    }
}

enum Lookup {
    Hit(Box<Report>),
    Miss,
    Invalid(InvalidationReason),
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LopperError::io(e, path)),
    }
}

/// Counts of entries currently stored in a cache directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub pointers: usize,
    pub objects: usize,
    pub bytes: u64,
}

/// Inspects a cache directory without opening it for use.
///
/// # Errors
/// Returns error if an existing cache directory cannot be listed.
pub fn inspect(root: &Path) -> Result<CacheStats> {
    let (pointers, pointer_bytes) = count_entries(&root.join(KEYS_DIR))?;
    let (objects, object_bytes) = count_entries(&root.join(OBJECTS_DIR))?;
    Ok(CacheStats {
        pointers,
        objects,
        bytes: pointer_bytes + object_bytes,
    })
}

fn count_entries(dir: &Path) -> Result<(usize, u64)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok((0, 0)),
        Err(e) => return Err(LopperError::io(e, dir)),
    };
    let mut count = 0;
    let mut bytes = 0;
    for entry in entries.filter_map(std::result::Result::ok) {
        if entry.path().extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        count += 1;
        bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
    }
    Ok((count, bytes))
}
