//! The artifact-resolver boundary.
//!
//! Resolution of library coordinates to local file paths belongs to the
//! package manager; this crate only defines the seam and ships a plain
//! directory-layout repository for standalone use.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ResolveError;

/// A `group:artifact:version` library coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Group identifier, e.g. `org.scala-lang`.
    pub group: String,
    /// Artifact identifier, e.g. `scala-library`.
    pub artifact: String,
    /// Version string.
    pub version: String,
}

impl Coordinate {
    /// Creates a coordinate from its three parts.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// Resolves library coordinates to local file paths.
///
/// Implemented by the host build system's dependency machinery; the core
/// only calls it. Resolution failure is fatal unless the caller probes with
/// [`try_resolve`](ArtifactResolver::try_resolve).
pub trait ArtifactResolver {
    /// Resolves a coordinate to one or more local paths.
    fn resolve(&self, coordinate: &Coordinate) -> Result<Vec<PathBuf>, ResolveError>;

    /// Probing variant for optional dependencies: `None` on any failure.
    fn try_resolve(&self, coordinate: &Coordinate) -> Option<Vec<PathBuf>> {
        self.resolve(coordinate).ok()
    }
}

/// A Maven-layout repository on the local filesystem.
///
/// Artifacts live at `<root>/<group-as-dirs>/<artifact>/<version>/
/// <artifact>-<version>.jar`.
pub struct DirRepository {
    root: PathBuf,
}

impl DirRepository {
    /// Creates a repository rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn jar_path(&self, coordinate: &Coordinate) -> PathBuf {
        let group_dirs: PathBuf = coordinate.group.split('.').collect();
        self.root
            .join(group_dirs)
            .join(&coordinate.artifact)
            .join(&coordinate.version)
            .join(format!(
                "{}-{}.jar",
                coordinate.artifact, coordinate.version
            ))
    }
}

impl ArtifactResolver for DirRepository {
    fn resolve(&self, coordinate: &Coordinate) -> Result<Vec<PathBuf>, ResolveError> {
        let path = self.jar_path(coordinate);
        if path.is_file() {
            Ok(vec![path])
        } else {
            Err(ResolveError::NotFound {
                coordinate: coordinate.to_string(),
            })
        }
    }
}

/// Resolver for dependencies pinned to explicit filesystem paths.
///
/// Paths are taken at face value; a missing file is reported against the
/// coordinate that referenced it.
pub struct PathResolver {
    base: PathBuf,
}

impl PathResolver {
    /// Creates a resolver interpreting relative paths against `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolves an explicit path declared for `coordinate`.
    pub fn resolve_path(
        &self,
        coordinate: &str,
        path: &Path,
    ) -> Result<PathBuf, ResolveError> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        };
        if full.exists() {
            Ok(full)
        } else {
            Err(ResolveError::NotFound {
                coordinate: coordinate.to_string(),
            })
        }
    }
}
