//! Production [`Compiler`] implementations over the process invoker.
//!
//! The drivers in `scargo_incremental` only know the `Compiler` seam; this
//! module fills it by assembling a scalac command line and running it
//! through the configured invocation strategy. In bridge mode the compiler
//! is asked to write per-file dependency facts to an analysis file, which is
//! read back after the run; a missing or corrupt file degrades to "no
//! analysis" (costing a full recompile next time, never correctness).
//!
//! Javac options are forwarded only in bridge mode (as `-javac-opt` pairs
//! understood by the bridge shim); the legacy scheme hands Java sources to
//! scalac directly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use scargo_common::{Logger, VersionNumber};
use scargo_config::CompileOrder;
use scargo_incremental::{
    BridgeBuilder, CompileError, CompileRequest, CompileResult, Compiler, DriverError,
    SourceAnalysis,
};
use scargo_invoke::{ForkedCaller, InProcessCaller, JavaCaller, JavaCommandBuilder, MainEntry};
use scargo_sources::{ArtifactResolver, Coordinate, DirRepository};

/// Main class of the Scala compiler.
pub const SCALAC_MAIN: &str = "scala.tools.nsc.Main";

/// Version of the incremental engine the bridge artifact targets.
pub const ENGINE_VERSION: &str = "1.9.6";

/// Java class-file version the bridge artifact is keyed by.
pub const JAVA_CLASS_VERSION: &str = "52.0";

/// Locates the `java` executable: `$JAVA_HOME/bin/java` if set, else `java`
/// from the search path.
pub fn java_executable() -> PathBuf {
    match std::env::var_os("JAVA_HOME") {
        Some(home) => Path::new(&home).join("bin").join("java"),
        None => PathBuf::from("java"),
    }
}

/// Reorders a mixed source set according to the compile order.
///
/// The relative order within each language is preserved, so the result is
/// still deterministic for a sorted input.
pub fn order_files(files: &[PathBuf], order: CompileOrder) -> Vec<PathBuf> {
    let is_java = |f: &PathBuf| f.extension().is_some_and(|e| e == "java");
    match order {
        CompileOrder::Mixed => files.to_vec(),
        CompileOrder::JavaThenScala => {
            let (java, scala): (Vec<_>, Vec<_>) = files.iter().cloned().partition(is_java);
            java.into_iter().chain(scala).collect()
        }
        CompileOrder::ScalaThenJava => {
            let (java, scala): (Vec<_>, Vec<_>) = files.iter().cloned().partition(is_java);
            scala.into_iter().chain(java).collect()
        }
    }
}

/// How the compiler process is executed.
pub enum CallerStrategy {
    /// Fork a child JVM, spilling long argument lists to a file.
    Forked {
        /// Always spill arguments regardless of length.
        force_arg_file: bool,
    },
    /// Dispatch to an embedded entry point in this process.
    InProcess {
        /// The embedded compiler entry point.
        entry: Arc<dyn MainEntry>,
    },
}

/// Delegating adapter so one embedded entry can serve many invocations.
struct SharedEntry(Arc<dyn MainEntry>);

impl MainEntry for SharedEntry {
    fn invoke(&self, args: &[String]) -> Result<i32, scargo_invoke::InvokeError> {
        self.0.invoke(args)
    }
}

/// Invokes scalac for the incremental drivers.
pub struct ScalacCompiler {
    java_exe: PathBuf,
    jvm_args: Vec<String>,
    strategy: CallerStrategy,
    /// When set, the compiler is asked to write per-file analysis here and
    /// the file is read back after each run (bridge mode).
    analysis_out: Option<PathBuf>,
    logger: Logger,
}

impl ScalacCompiler {
    /// Creates a compiler using the given strategy.
    pub fn new(
        java_exe: PathBuf,
        jvm_args: Vec<String>,
        strategy: CallerStrategy,
        analysis_out: Option<PathBuf>,
        logger: Logger,
    ) -> Self {
        Self {
            java_exe,
            jvm_args,
            strategy,
            analysis_out,
            logger,
        }
    }

    fn build_command(
        &self,
        request: &CompileRequest,
        files: &[PathBuf],
    ) -> scargo_invoke::JavaCommand {
        let mut builder = JavaCommandBuilder::new(&self.java_exe, SCALAC_MAIN)
            .jvm_args(self.jvm_args.iter().cloned())
            .option("-classpath", request.classpath.to_search_path())
            .option("-d", request.output_dir.to_string_lossy());

        for opt in &request.scalac_options {
            builder = builder.arg(opt);
        }

        if let Some(ref analysis) = self.analysis_out {
            builder = builder.option("-analysis-out", analysis.to_string_lossy());
            for opt in &request.javac_options {
                builder = builder.option("-javac-opt", opt);
            }
        }

        builder
            .args(
                order_files(files, request.compile_order)
                    .iter()
                    .map(|f| f.to_string_lossy().into_owned()),
            )
            .build()
    }
}

impl Compiler for ScalacCompiler {
    fn compile(
        &self,
        request: &CompileRequest,
        files: &[PathBuf],
    ) -> Result<CompileResult, CompileError> {
        if let Some(parent) = self.analysis_out.as_ref().and_then(|p| p.parent()) {
            // The bridge writes its analysis here; make sure it can.
            let _ = std::fs::create_dir_all(parent);
        }

        let command = self.build_command(request, files);
        let caller: Box<dyn JavaCaller> = match &self.strategy {
            CallerStrategy::Forked { force_arg_file } => Box::new(ForkedCaller::new(
                command,
                *force_arg_file,
                self.logger.clone(),
            )),
            CallerStrategy::InProcess { entry } => Box::new(InProcessCaller::new(
                command,
                Box::new(SharedEntry(entry.clone())),
                self.logger.clone(),
            )),
        };

        let success = caller
            .run("scalac", false)
            .map_err(CompileError::invocation)?;

        let analysis = match &self.analysis_out {
            Some(path) => read_analysis(path, &self.logger),
            None => Vec::new(),
        };

        Ok(CompileResult { success, analysis })
    }
}

/// One entry of the analysis file written by the bridge shim.
#[derive(Debug, Deserialize)]
struct AnalysisEntry {
    file: PathBuf,
    #[serde(default)]
    dependencies: Vec<PathBuf>,
    #[serde(default)]
    produced_classes: Vec<String>,
}

/// Reads the bridge's analysis file, fail-safe.
fn read_analysis(path: &Path, logger: &Logger) -> Vec<SourceAnalysis> {
    let Ok(content) = std::fs::read_to_string(path) else {
        logger.debug(&format!("no analysis file at {}", path.display()));
        return Vec::new();
    };
    match serde_json::from_str::<Vec<AnalysisEntry>>(&content) {
        Ok(entries) => entries
            .into_iter()
            .map(|e| SourceAnalysis {
                file: e.file,
                dependencies: e.dependencies,
                produced_classes: e.produced_classes,
            })
            .collect(),
        Err(e) => {
            logger.warn(&format!(
                "discarding unreadable analysis file {}: {e}",
                path.display()
            ));
            Vec::new()
        }
    }
}

/// Materializes the bridge artifact from the artifact repository.
///
/// Precompiled bridges are published per compiler minor version; the builder
/// resolves the matching coordinate and copies the jar into the cache slot.
pub struct RepositoryBridgeBuilder {
    repository: DirRepository,
}

impl RepositoryBridgeBuilder {
    /// Creates a builder resolving against the given repository.
    pub fn new(repository: DirRepository) -> Self {
        Self { repository }
    }

    fn coordinate(scala_version: &VersionNumber) -> Coordinate {
        Coordinate::new(
            "org.scala-sbt",
            format!(
                "compiler-bridge_{}.{}",
                scala_version.major, scala_version.minor
            ),
            ENGINE_VERSION,
        )
    }
}

impl BridgeBuilder for RepositoryBridgeBuilder {
    fn build(&self, scala_version: &VersionNumber, dest: &Path) -> Result<(), DriverError> {
        let coordinate = Self::coordinate(scala_version);
        let state_err = |source| DriverError::State {
            path: dest.to_path_buf(),
            source,
        };

        let jars = self.repository.resolve(&coordinate).map_err(|e| {
            state_err(std::io::Error::new(std::io::ErrorKind::NotFound, e))
        })?;
        std::fs::copy(&jars[0], dest).map_err(state_err)?;
        Ok(())
    }
}
