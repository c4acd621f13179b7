//! Source file discovery using the `ignore` crate.
//!
//! Finds the Go files that make up one package directory, following the
//! same inclusion rules as the Go tool:
//!
//! - only `*.go` files
//! - names starting with `_` or `.` are skipped
//! - `*_test.go` files are skipped unless tests are requested
//!
//! Traversal is gitignore-aware. By default only the top-level directory is
//! read, because a Go package is exactly one directory.

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SemtypeError};
use crate::parser::GO_EXTENSION;
use crate::types::SourceFile;

/// Directories never scanned in recursive mode.
const DEFAULT_IGNORE_PATTERNS: &[&str] = &["vendor/", "testdata/"];

/// Controls which files are collected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Include `*_test.go` files.
    pub include_tests: bool,
    /// Extra glob patterns to exclude.
    pub ignore: Vec<String>,
}

impl ScanOptions {
    /// User patterns first, then defaults that are not already present.
    pub fn ignore_patterns(&self) -> Vec<String> {
        let mut patterns = self.ignore.clone();
        for default in DEFAULT_IGNORE_PATTERNS {
            if !patterns.iter().any(|p| p == default) {
                patterns.push(default.to_string());
            }
        }
        patterns
    }
}

/// Whether the Go tool would compile this file into the package.
fn is_package_file(path: &Path, include_tests: bool) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('_') || name.starts_with('.') {
        return false;
    }
    if path.extension().and_then(|e| e.to_str()) != Some(GO_EXTENSION) {
        return false;
    }
    include_tests || !name.ends_with("_test.go")
}

/// List the package's source files, sorted by path.
pub fn scan_directory(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(SemtypeError::SourceDirNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true) // Go ignores dot-directories
        .git_ignore(true) // Respect .gitignore
        .git_exclude(true) // Respect .git/info/exclude
        .follow_links(false)
        .max_depth(if options.recursive { None } else { Some(1) });

    // The ! prefix tells the override builder to exclude matches
    let mut override_builder = OverrideBuilder::new(root);
    for pattern in options.ignore_patterns() {
        override_builder
            .add(&format!("!{}", pattern))
            .map_err(|e| SemtypeError::Config {
                message: format!("invalid ignore pattern '{}': {}", pattern, e),
            })?;
    }
    let overrides = override_builder.build().map_err(|e| SemtypeError::Config {
        message: e.to_string(),
    })?;
    builder.overrides(overrides);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let is_file = entry.file_type().map(|ft| ft.is_file()).unwrap_or(false);
        if is_file && is_package_file(entry.path(), options.include_tests) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), files = files.len(), "Scanned source directory");
    Ok(files)
}

/// Read every file. Any failure is fatal.
pub fn read_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .map(|source| SourceFile::new(path.clone(), source))
                .map_err(|e| SemtypeError::io(path, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "package p\n").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_go_package_rules() {
        let dir = TempDir::new().unwrap();
        for f in ["b.go", "a.go", "a_test.go", "_skip.go", ".hidden.go", "notes.txt", "semtype.json"] {
            touch(dir.path(), f);
        }

        let files = scan_directory(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(names(dir.path(), &files), vec!["a.go", "b.go"]);

        let with_tests = ScanOptions {
            include_tests: true,
            ..Default::default()
        };
        let files = scan_directory(dir.path(), &with_tests).unwrap();
        assert_eq!(names(dir.path(), &files), vec!["a.go", "a_test.go", "b.go"]);
    }

    #[test]
    fn test_recursive_scan() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "root.go");
        touch(dir.path(), "sub/inner.go");
        touch(dir.path(), "vendor/dep/dep.go");
        touch(dir.path(), "gen/generated.go");

        let flat = scan_directory(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(names(dir.path(), &flat), vec!["root.go"]);

        let options = ScanOptions {
            recursive: true,
            ignore: vec!["gen/".to_string()],
            ..Default::default()
        };
        let deep = scan_directory(dir.path(), &options).unwrap();
        assert_eq!(names(dir.path(), &deep), vec!["root.go", "sub/inner.go"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            scan_directory(&missing, &ScanOptions::default()),
            Err(SemtypeError::SourceDirNotFound { .. })
        ));
    }

    #[test]
    fn test_ignore_patterns_with_defaults() {
        let options = ScanOptions {
            ignore: vec!["custom/".to_string(), "vendor/".to_string()],
            ..Default::default()
        };
        let patterns = options.ignore_patterns();
        assert_eq!(patterns[0], "custom/");
        assert_eq!(patterns.iter().filter(|p| *p == "vendor/").count(), 1);
        assert!(patterns.contains(&"testdata/".to_string()));
    }

    #[test]
    fn test_read_sources() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.go");
        let files = scan_directory(dir.path(), &ScanOptions::default()).unwrap();
        let sources = read_sources(&files).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source, "package p\n");
    }
}
