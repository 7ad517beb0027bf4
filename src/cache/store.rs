// src/cache/store.rs
//! Filesystem primitives for the cache: directory creation and atomic writes.

use crate::error::{LopperError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Creates a cache directory (and parents) with owner+group access only.
///
/// # Errors
/// Returns error if the directory cannot be created.
pub fn create_private_dir(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o750);
    }
    builder.create(path).map_err(|e| LopperError::io(e, path))
}

/// Writes `bytes` to `dest` atomically.
///
/// The content goes to a temp file in the destination directory, which is
/// then renamed over `dest`. Readers observe either the old or the new file.
/// Where renaming over an existing file fails, the content is written
/// directly instead; that fallback is not atomic.
///
/// # Errors
/// Returns error if neither the rename nor the direct write succeeds.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    let dir = dest
        .parent()
        .ok_or_else(|| LopperError::Other(format!("no parent directory for {}", dest.display())))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(LopperError::TempFile)?;
    tmp.write_all(bytes).map_err(|e| LopperError::io(e, tmp.path()))?;
    tmp.flush().map_err(|e| LopperError::io(e, tmp.path()))?;
    set_private_mode(tmp.path());

    match tmp.persist(dest) {
        Ok(_) => Ok(()),
        Err(err) => {
            tracing::debug!(path = %dest.display(), error = %err.error, "rename failed, overwriting in place");
            drop(err.file);
            fs::write(dest, bytes).map_err(|e| LopperError::io(e, dest))?;
            set_private_mode(dest);
            Ok(())
        }
    }
}

#[cfg(unix)]
fn set_private_mode(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
}

#[cfg(not(unix))]
fn set_private_mode(_path: &Path) {}
