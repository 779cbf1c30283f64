//! The legacy timestamp-based incremental driver.
//!
//! Persists a single "last successful compile" timestamp per output
//! directory as the modification time of a marker file, and recompiles
//! whatever changed since. Without dependency information, partial
//! recompilation of Scala is unsound, so the default policy escalates any
//! change to a full recompile; the historical `modified-only` policy is kept
//! for back-compat.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use scargo_common::{ContentHash, Logger};

use crate::driver::{CompileRequest, Compiler, Outcome};
use crate::error::DriverError;

/// Recompilation policy of the legacy driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyMode {
    /// Any modified file triggers recompilation of the entire source set.
    All,
    /// Recompile only modified files, plus every Java file whenever any
    /// Scala file changed (the legacy compiler could not reuse class files
    /// for unchanged Java sources referenced by recompiled Scala).
    ModifiedOnly,
}

/// The timestamp-based driver.
///
/// Not safe for concurrent invocations against the same output directory:
/// the marker file is read-modify-written without locking. Distinct output
/// directories are independent.
pub struct LegacyTimestampDriver {
    mode: LegacyMode,
    logger: Logger,
}

impl LegacyTimestampDriver {
    /// Creates a driver with the given recompilation policy.
    pub fn new(mode: LegacyMode, logger: Logger) -> Self {
        Self { mode, logger }
    }

    /// Returns the marker file path for an output directory and source-root set.
    ///
    /// The roots are hashed into the file name so two compiles sharing an
    /// output directory but differing in roots do not share state.
    pub fn marker_path(output_dir: &Path, source_roots: &[PathBuf]) -> PathBuf {
        let mut roots = source_roots.to_vec();
        roots.sort();
        let hash = ContentHash::of_paths(&roots).short();
        let name = output_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        output_dir.with_file_name(format!("{name}.{hash}.timestamp"))
    }

    /// Decides what to compile, invokes the compiler, and updates the marker.
    ///
    /// `sources` is the scanned candidate set, already sorted. Returns
    /// [`Outcome::NoSources`] for an empty set and [`Outcome::UpToDate`]
    /// when nothing changed; in both cases the compiler is not invoked and
    /// the marker is untouched.
    pub fn compile(
        &self,
        compiler: &dyn Compiler,
        request: &CompileRequest,
        sources: &[PathBuf],
    ) -> Result<Outcome, DriverError> {
        if sources.is_empty() {
            return Ok(Outcome::NoSources);
        }

        let marker = Self::marker_path(&request.output_dir, &request.source_roots);
        let last_compile = read_marker(&marker, &request.output_dir);
        if last_compile.is_none() {
            self.logger
                .debug(&format!("no usable marker at {}, full recompile", marker.display()));
        }

        let modified: Vec<PathBuf> = sources
            .iter()
            .filter(|f| is_modified_since(f, last_compile))
            .cloned()
            .collect();

        if modified.is_empty() {
            return Ok(Outcome::UpToDate);
        }

        let to_compile: Vec<PathBuf> = match self.mode {
            LegacyMode::All => sources.to_vec(),
            LegacyMode::ModifiedOnly => {
                let scala_changed = modified.iter().any(|f| has_extension(f, "scala"));
                sources
                    .iter()
                    .filter(|f| {
                        modified.contains(f) || (scala_changed && has_extension(f, "java"))
                    })
                    .cloned()
                    .collect()
            }
        };

        self.logger.debug(&format!(
            "{} of {} file(s) modified, compiling {}",
            modified.len(),
            sources.len(),
            to_compile.len()
        ));

        // The marker is advanced to the start of the compile, not the end:
        // a file touched while the compiler runs stays dirty for the next run.
        let compile_start = SystemTime::now();

        let result = compiler
            .compile(request, &to_compile)
            .map_err(DriverError::Compiler)?;

        if !result.success {
            return Err(DriverError::CompileFailed {
                files: to_compile.len(),
            });
        }

        advance_marker(&marker, compile_start)?;
        Ok(Outcome::Compiled(to_compile.len()))
    }
}

/// Reads the persisted timestamp, treating any problem as "never compiled".
///
/// An absent marker, an unreadable marker, or an empty output directory all
/// force a full recompile rather than propagating an error.
fn read_marker(marker: &Path, output_dir: &Path) -> Option<SystemTime> {
    if output_dir_is_empty(output_dir) {
        return None;
    }
    std::fs::metadata(marker).and_then(|m| m.modified()).ok()
}

fn output_dir_is_empty(output_dir: &Path) -> bool {
    match std::fs::read_dir(output_dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

/// `true` if the file changed at or after the recorded compile start.
///
/// Unreadable metadata counts as modified.
fn is_modified_since(file: &Path, last_compile: Option<SystemTime>) -> bool {
    let Some(last) = last_compile else {
        return true;
    };
    match std::fs::metadata(file).and_then(|m| m.modified()) {
        Ok(mtime) => mtime >= last,
        Err(_) => true,
    }
}

/// Creates the marker if absent and sets its mtime to `compile_start`.
fn advance_marker(marker: &Path, compile_start: SystemTime) -> Result<(), DriverError> {
    let state_err = |source| DriverError::State {
        path: marker.to_path_buf(),
        source,
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(marker)
        .map_err(state_err)?;
    file.set_modified(compile_start).map_err(state_err)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}
