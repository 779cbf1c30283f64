//! User-level cache of compiler-bridge artifacts.
//!
//! The bridge is a small shim jar adapting one compiler version to the
//! incremental engine's interface. Building it needs a compiler run, so the
//! result is cached under a user-level directory keyed by compiler version,
//! engine version, and Java class-file version; repeated builds across
//! projects reuse it.

use std::path::{Path, PathBuf};

use scargo_common::VersionNumber;

use crate::error::DriverError;

/// File name of the cached bridge artifact.
const BRIDGE_JAR: &str = "compiler-bridge.jar";

/// Materializes a bridge artifact for a compiler version.
///
/// The production implementation compiles the shim sources against the
/// target compiler; tests substitute a recorder.
pub trait BridgeBuilder {
    /// Builds the bridge for `scala_version`, writing the jar to `dest`.
    fn build(&self, scala_version: &VersionNumber, dest: &Path) -> Result<(), DriverError>;
}

/// The on-disk bridge cache.
pub struct BridgeCache {
    root: PathBuf,
}

impl BridgeCache {
    /// Creates a cache rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cache slot for one version combination.
    pub fn bridge_dir(
        &self,
        scala_version: &VersionNumber,
        engine_version: &str,
        java_class_version: &str,
    ) -> PathBuf {
        self.root.join(format!(
            "bridge-{scala_version}-{engine_version}-{java_class_version}"
        ))
    }

    /// Returns the bridge jar path, materializing it on first use.
    ///
    /// If the jar is already present it is returned as-is; otherwise the
    /// builder runs once and the result is kept for every later call and
    /// every other project sharing the cache root.
    pub fn ensure(
        &self,
        scala_version: &VersionNumber,
        engine_version: &str,
        java_class_version: &str,
        builder: &dyn BridgeBuilder,
    ) -> Result<PathBuf, DriverError> {
        let dir = self.bridge_dir(scala_version, engine_version, java_class_version);
        let jar = dir.join(BRIDGE_JAR);
        if jar.is_file() {
            return Ok(jar);
        }

        std::fs::create_dir_all(&dir).map_err(|e| DriverError::State {
            path: dir.clone(),
            source: e,
        })?;
        builder.build(scala_version, &jar)?;
        Ok(jar)
    }
}
