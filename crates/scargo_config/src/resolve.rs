//! Scope resolution: turning raw configuration into absolute main/test
//! compile settings.

use crate::types::ProjectConfig;
use std::path::{Path, PathBuf};

/// Which source set a compile invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The main source set.
    Main,
    /// The test source set.
    Test,
}

impl Scope {
    /// Stable name used for analysis cache files and log messages.
    pub fn name(self) -> &'static str {
        match self {
            Scope::Main => "main",
            Scope::Test => "test",
        }
    }
}

/// A fully resolved scope with absolute paths.
///
/// Main and test scopes get distinct analysis cache files so their
/// incremental state cannot corrupt each other.
#[derive(Debug, Clone)]
pub struct ResolvedScope {
    /// The scope this resolution is for.
    pub scope: Scope,
    /// Absolute source root directories. May include directories that do not
    /// exist; the scanner drops those silently.
    pub source_roots: Vec<PathBuf>,
    /// Absolute class-file output directory.
    pub output_dir: PathBuf,
    /// Absolute path of this scope's analysis cache file.
    pub analysis_cache: PathBuf,
    /// Include glob patterns.
    pub includes: Vec<String>,
    /// Exclude glob patterns.
    pub excludes: Vec<String>,
}

/// Resolves a scope's directories against the project root.
pub fn resolve_scope(config: &ProjectConfig, scope: Scope, project_dir: &Path) -> ResolvedScope {
    let roots = match scope {
        Scope::Main => &config.sources.roots,
        Scope::Test => &config.sources.test_roots,
    };
    let output = match scope {
        Scope::Main => &config.output.dir,
        Scope::Test => &config.output.test_dir,
    };

    ResolvedScope {
        scope,
        source_roots: roots.iter().map(|r| project_dir.join(r)).collect(),
        output_dir: project_dir.join(output),
        analysis_cache: project_dir
            .join(&config.output.analysis_dir)
            .join(format!("{}.bin", scope.name())),
        includes: config.sources.includes.clone(),
        excludes: config.sources.excludes.clone(),
    }
}
