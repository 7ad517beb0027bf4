// src/walker.rs
//! Enumerates the files under a root whose content affects analysis results.

use crate::digest::hash_file;
use crate::error::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Directories never descended into: VCS metadata, build output, caches.
pub const PRUNE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".lopper-cache",
    "node_modules",
    "target",
    "dist",
    "build",
    "out",
    "vendor",
    ".venv",
    "venv",
    "__pycache__",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".gradle",
    ".next",
    ".nuxt",
    ".idea",
    ".vscode",
    "coverage",
];

/// Source extensions understood by at least one language adapter.
pub const SOURCE_EXT_PATTERN: &str = r"(?i)\.(js|jsx|mjs|cjs|ts|tsx|mts|cts|py|pyi|go|rs|java|kt|kts|cs|fs|vb|php|rb|swift|dart|ex|exs|c|h|cc|cpp|cxx|hh|hpp|hxx)$";

/// Manifests and lockfiles whose content changes dependency resolution.
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "tsconfig.json",
    "jsconfig.json",
    "pyproject.toml",
    "requirements.txt",
    "requirements-dev.txt",
    "setup.py",
    "setup.cfg",
    "Pipfile",
    "Pipfile.lock",
    "poetry.lock",
    "uv.lock",
    "go.mod",
    "go.sum",
    "go.work",
    "Cargo.toml",
    "Cargo.lock",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "settings.gradle.kts",
    "gradle.lockfile",
    "packages.lock.json",
    "Directory.Packages.props",
    "composer.json",
    "composer.lock",
    "Gemfile",
    "Gemfile.lock",
    "Package.swift",
    "Package.resolved",
    "pubspec.yaml",
    "pubspec.lock",
    "mix.exs",
    "mix.lock",
    "CMakeLists.txt",
    "conanfile.txt",
    "vcpkg.json",
];

static SOURCE_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SOURCE_EXT_PATTERN).unwrap_or_else(|_| panic!("Invalid Regex")));

/// A relevant file and the digest of its content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileRecord {
    /// Path relative to the walked root, with forward slashes.
    pub path: String,
    pub digest: String,
}

impl FileRecord {
    /// The `path\0digest` line fed into the input digest.
    #[must_use]
    pub fn record_line(&self) -> String {
        format!("{}\0{}", self.path, self.digest)
    }
}

/// Returns true for directory names that are never walked.
#[must_use]
pub fn should_prune(name: &str) -> bool {
    PRUNE_DIRS.contains(&name)
}

/// Returns true if the file name marks a file that analysis depends on.
#[must_use]
pub fn is_relevant(file_name: &str) -> bool {
    if MANIFEST_FILES.contains(&file_name) {
        return true;
    }
    if file_name.ends_with(".csproj") || file_name.ends_with(".fsproj") || file_name.ends_with(".gemspec") {
        return true;
    }
    SOURCE_EXT_RE.is_match(file_name)
}

/// Walks `root` and hashes every relevant file.
///
/// Records come back sorted by path, so the result is independent of
/// directory enumeration order.
///
/// # Errors
/// Returns error if the walk fails or a relevant file exists but cannot be read.
pub fn collect_relevant_files(root: &Path) -> Result<Vec<FileRecord>> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !should_prune(&e.file_name().to_string_lossy()));

    let mut records = Vec::new();
    for item in walker {
        let entry = item?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !is_relevant(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        records.push(FileRecord {
            path: normalize_path(rel),
            digest: hash_file(entry.path())?,
        });
    }

    records.sort();
    Ok(records)
}

/// Normalizes a path to use forward slashes (cross-platform digests).
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_relevant_names() {
        assert!(is_relevant("index.ts"));
        assert!(is_relevant("main.GO"));
        assert!(is_relevant("package.json"));
        assert!(is_relevant("App.csproj"));
        assert!(!is_relevant("README.md"));
        assert!(!is_relevant("logo.png"));
    }

    #[test]
    fn test_prunes_build_and_vcs_dirs() -> Result<()> {
        let temp = TempDir::new()?;
        let root = temp.path();
        fs::create_dir_all(root.join("src"))?;
        fs::create_dir_all(root.join("node_modules/lodash"))?;
        fs::create_dir_all(root.join(".git"))?;
        fs::write(root.join("src/index.js"), "require('lodash')")?;
        fs::write(root.join("node_modules/lodash/index.js"), "module.exports = {}")?;
        fs::write(root.join(".git/config.py"), "x = 1")?;
        fs::write(root.join("package.json"), "{}")?;
        fs::write(root.join("notes.txt"), "ignored")?;

        let records = collect_relevant_files(root)?;
        let paths: Vec<_> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["package.json", "src/index.js"]);
        Ok(())
    }

    #[test]
    fn test_records_sorted_and_stable() -> Result<()> {
        let temp = TempDir::new()?;
        let root = temp.path();
        for name in ["z.py", "a.py", "m/b.py", "m/a.py"] {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, name)?;
        }
        let first = collect_relevant_files(root)?;
        let second = collect_relevant_files(root)?;
        assert_eq!(first, second);
        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(first, sorted);
        Ok(())
    }

    #[test]
    fn test_record_line_uses_nul_separator() {
        let record = FileRecord {
            path: "src/a.rs".into(),
            digest: "abc".into(),
        };
        assert_eq!(record.record_line(), "src/a.rs\0abc");
    }
}
