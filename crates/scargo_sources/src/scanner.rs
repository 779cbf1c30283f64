//! Deterministic source-set scanning.
//!
//! Given root directories and include/exclude glob filters, the scanner
//! produces the ordered list of candidate source files for one compile
//! invocation. Determinism is a contract: the downstream compiler process is
//! sensitive to argument order, and reproducible builds across platforms
//! depend on a stable, sorted file list.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use scargo_common::VersionNumber;

use crate::error::ScanError;

/// Minimum compiler version able to accept Java sources directly.
const JAVA_SUPPORT_SINCE: (u32, u32, u32) = (2, 7, 2);

/// Returns `true` if the given compiler version accepts `.java` sources.
///
/// The `0.0.0` sentinel means the version could not be detected; it is
/// treated as "supports Java" rather than "older than everything".
pub fn supports_java_sources(version: &VersionNumber) -> bool {
    if version.is_zero() {
        return true;
    }
    let (maj, min, fix) = JAVA_SUPPORT_SINCE;
    version.compare(&VersionNumber::new(maj, min, fix)) != std::cmp::Ordering::Less
}

/// Scans source roots for candidate files through compiled glob filters.
///
/// Filters are compiled once at construction and reused, so repeated calls
/// in the same process return identical results for unchanged disk state.
#[derive(Debug)]
pub struct Scanner {
    includes: GlobSet,
    excludes: GlobSet,
}

impl Scanner {
    /// Builds a scanner from include/exclude patterns.
    ///
    /// When `forward_java` is set and the compiler version supports it,
    /// `**/*.java` is appended to the include set.
    pub fn new(
        includes: &[String],
        excludes: &[String],
        forward_java: bool,
        scala_version: &VersionNumber,
    ) -> Result<Self, ScanError> {
        let mut include_patterns: Vec<String> = includes.to_vec();
        if forward_java && supports_java_sources(scala_version) {
            include_patterns.push("**/*.java".to_string());
        }

        Ok(Self {
            includes: compile_globs(&include_patterns)?,
            excludes: compile_globs(excludes)?,
        })
    }

    /// Scans the given roots and returns the union of matching files.
    ///
    /// Roots that do not exist are silently dropped. Matches are
    /// canonicalized, deduplicated, and returned sorted, so two roots that
    /// reach the same file through equivalent paths contribute it once.
    pub fn scan(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>, ScanError> {
        let mut found = BTreeSet::new();
        for root in roots {
            if !root.is_dir() {
                continue;
            }
            self.walk(root, root, &mut found)?;
        }
        Ok(found.into_iter().collect())
    }

    fn walk(
        &self,
        root: &Path,
        dir: &Path,
        found: &mut BTreeSet<PathBuf>,
    ) -> Result<(), ScanError> {
        let entries = std::fs::read_dir(dir).map_err(|e| ScanError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| ScanError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_dir() {
                self.walk(root, &path, found)?;
                continue;
            }
            // Globs are written relative to the root they apply to.
            let rel = match path.strip_prefix(root) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            if self.includes.is_match(rel) && !self.excludes.is_match(rel) {
                // Files can disappear between the directory read and here.
                if let Ok(canonical) = std::fs::canonicalize(&path) {
                    found.insert(canonical);
                }
            }
        }
        Ok(())
    }
}

fn compile_globs(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScanError::InvalidPattern {
        pattern: patterns.join(", "),
        reason: e.to_string(),
    })
}
