//! The bridge-based incremental driver.
//!
//! Wraps the incremental-compilation engine: callers hand over the *full*
//! source set and the driver works out the minimal recompilation set from
//! its persisted analysis, recompiling changed files plus the transitive
//! closure of their dependents. The analysis is persisted after every
//! compile, including failed ones, so the next run can still compute
//! dependencies; a compile error must never leave the cache unusable.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use scargo_common::Logger;

use crate::analysis::AnalysisStore;
use crate::driver::{CompileRequest, Compiler, Outcome};
use crate::error::DriverError;

/// The dependency-graph-based driver.
///
/// Owns the analysis store for its cache file path. Construct one per output
/// target and reuse it across loop iterations; loading the store is the
/// expensive part. Not safe for concurrent invocations against the same
/// output directory.
pub struct BridgeDriver {
    store: AnalysisStore,
    logger: Logger,
}

impl BridgeDriver {
    /// Creates a driver bound to the given analysis cache file.
    ///
    /// An unreadable or stale cache file starts the driver empty, which
    /// forces a full recompile on the first invocation.
    pub fn new(cache_path: &Path, tool_version: &str, logger: Logger) -> Self {
        Self {
            store: AnalysisStore::load_or_default(cache_path, tool_version),
            logger,
        }
    }

    /// Number of files in the loaded analysis (diagnostic).
    pub fn analyzed_files(&self) -> usize {
        self.store.len()
    }

    /// Compiles whatever the analysis says is out of date.
    ///
    /// `sources` is the full scanned source set; the driver does its own
    /// change detection and affected-file propagation. Returns
    /// [`Outcome::UpToDate`] without invoking the compiler when nothing
    /// relevant changed.
    pub fn compile(
        &mut self,
        compiler: &dyn Compiler,
        request: &CompileRequest,
        sources: &[PathBuf],
    ) -> Result<Outcome, DriverError> {
        if sources.is_empty() {
            return Ok(Outcome::NoSources);
        }

        let hashes = AnalysisStore::hash_files(sources);
        let changes = self.store.detect_changes(&hashes);
        if changes.is_empty() {
            return Ok(Outcome::UpToDate);
        }

        // Deletions seed invalidation like edits do, but are not compiled.
        let mut seeds: BTreeSet<PathBuf> = changes
            .new_files
            .iter()
            .chain(&changes.modified_files)
            .cloned()
            .collect();
        seeds.extend(changes.deleted_files.iter().cloned());

        let affected = self.store.affected_by(&seeds);

        let to_compile: Vec<PathBuf> = changes
            .new_files
            .iter()
            .chain(&changes.modified_files)
            .chain(affected.iter())
            .filter(|f| hashes.contains_key(*f))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        self.logger.debug(&format!(
            "{} dirty, {} deleted, {} affected; compiling {} of {} file(s)",
            changes.dirty_count(),
            changes.deleted_files.len(),
            affected.len(),
            to_compile.len(),
            sources.len()
        ));

        if to_compile.is_empty() {
            // Deletion with no surviving dependents: just prune the analysis.
            self.store.remove(&changes.deleted_files);
            self.store.save()?;
            return Ok(Outcome::UpToDate);
        }

        let result = compiler
            .compile(request, &to_compile)
            .map_err(DriverError::Compiler)?;

        // Whatever the compiler analyzed is recorded even on failure; files
        // it did not get to keep their previous hashes and stay dirty.
        self.store.apply(&result.analysis, &hashes);
        if result.success {
            self.store.remove(&changes.deleted_files);
        }
        self.store.save()?;

        if result.success {
            Ok(Outcome::Compiled(to_compile.len()))
        } else {
            Err(DriverError::CompileFailed {
                files: to_compile.len(),
            })
        }
    }
}
