//! `scargo compile` — the per-invocation compile orchestrator.
//!
//! Resolves directories, scans candidates, dispatches to the configured
//! incremental driver, and maps the driver's outcome to user-facing
//! reporting with preparation/compile phase timers. Aggregates main and test
//! scopes: a main failure skips the test scope entirely.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use scargo_common::{Logger, VersionNumber};
use scargo_config::{
    load_config, resolve_scope, ConfigError, ProjectConfig, RecompileMode, ResolvedScope, Scope,
};
use scargo_incremental::{
    BridgeCache, BridgeDriver, CompileRequest, DriverError, LegacyMode, LegacyTimestampDriver,
    Outcome,
};
use scargo_sources::{
    ArtifactResolver, Classpath, ClasspathBuilder, Coordinate, DirRepository, PathResolver,
    ResolveError, Scanner,
};

use crate::compiler::{
    java_executable, CallerStrategy, RepositoryBridgeBuilder, ScalacCompiler, ENGINE_VERSION,
    JAVA_CLASS_VERSION,
};
use crate::project::resolve_project_root;
use crate::{CompileArgs, GlobalArgs};

/// Errors surfaced by one orchestrated compile invocation.
///
/// Typed failures pass through unwrapped; anything else is wrapped exactly
/// once with the original cause preserved.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// A configuration problem (fatal, no retry).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A dependency could not be resolved (fatal).
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The compiler ran and reported errors.
    #[error("compilation failed in {scope} scope")]
    CompileFailed {
        /// Which scope failed.
        scope: &'static str,
    },

    /// Generic wrapper for everything else, original cause preserved.
    #[error("compile execution failed: {source}")]
    Internal {
        /// The wrapped cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ExecutionError {
    fn wrap(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal {
            source: Box::new(source),
        }
    }
}

/// Aggregated result of one orchestrated invocation.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Outcome of the main scope, if it ran to completion.
    pub main: Option<Outcome>,
    /// Outcome of the test scope, if it ran to completion.
    pub test: Option<Outcome>,
    /// The first failure, if any.
    pub error: Option<ExecutionError>,
}

impl ExecutionReport {
    /// `true` when no scope failed.
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    /// `true` when at least one scope actually invoked the compiler.
    pub fn compiled_anything(&self) -> bool {
        self.main.map(|o| o.file_count() > 0).unwrap_or(false)
            || self.test.map(|o| o.file_count() > 0).unwrap_or(false)
    }
}

/// The compile orchestrator.
///
/// Owns the expensive per-process state: compiled glob filters and the
/// bridge drivers with their loaded analyses. Construct once and reuse
/// across watch-loop iterations.
pub struct Orchestrator {
    config: ProjectConfig,
    project_dir: PathBuf,
    scala_version: VersionNumber,
    logger: Logger,
    scanner: Scanner,
    repository_root: PathBuf,
    repository: DirRepository,
    cache_root: PathBuf,
    java_exe: PathBuf,
    entry_point: Option<Arc<dyn scargo_invoke::MainEntry>>,
    fork_warned: bool,
    main_driver: Option<BridgeDriver>,
    test_driver: Option<BridgeDriver>,
    bridge_jar: Option<PathBuf>,
    bridge_checked: bool,
}

impl Orchestrator {
    /// Builds an orchestrator for one project.
    pub fn new(
        config: ProjectConfig,
        project_dir: PathBuf,
        logger: Logger,
    ) -> Result<Self, ExecutionError> {
        let scala_version = VersionNumber::parse(&config.project.scala_version)
            .map_err(ConfigError::InvalidVersion)?;

        let scanner = Scanner::new(
            &config.sources.includes,
            &config.sources.excludes,
            config.sources.send_java_to_compiler,
            &scala_version,
        )
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        let repository_root = default_repository_root();
        Ok(Self {
            config,
            project_dir,
            scala_version,
            logger,
            scanner,
            repository: DirRepository::new(&repository_root),
            repository_root,
            cache_root: default_cache_root(),
            java_exe: java_executable(),
            entry_point: None,
            fork_warned: false,
            main_driver: None,
            test_driver: None,
            bridge_jar: None,
            bridge_checked: false,
        })
    }

    /// Overrides the Java executable (hosts and tests).
    pub fn with_java_exe(mut self, java_exe: impl Into<PathBuf>) -> Self {
        self.java_exe = java_exe.into();
        self
    }

    /// Overrides the artifact repository root (hosts and tests).
    pub fn with_repository(mut self, root: impl Into<PathBuf>) -> Self {
        self.repository_root = root.into();
        self.repository = DirRepository::new(&self.repository_root);
        self
    }

    /// Overrides the user-level bridge cache root (hosts and tests).
    pub fn with_cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = root.into();
        self
    }

    /// Registers an embedded compiler entry point.
    ///
    /// Used together with `fork = false`: hosts that link a compiler can run
    /// it in-process, skipping JVM startup. Without a registered entry point
    /// the fork setting is ignored with a warning.
    pub fn with_entry_point(mut self, entry: Arc<dyn scargo_invoke::MainEntry>) -> Self {
        self.entry_point = Some(entry);
        self
    }

    /// Picks the invocation strategy from configuration, once per compile.
    fn caller_strategy(&mut self) -> CallerStrategy {
        if !self.config.compiler.fork {
            if let Some(ref entry) = self.entry_point {
                return CallerStrategy::InProcess {
                    entry: entry.clone(),
                };
            }
            if !self.fork_warned {
                self.fork_warned = true;
                self.logger.warn(
                    "fork = false requires an embedded compiler entry point; forking instead",
                );
            }
        }
        CallerStrategy::Forked {
            force_arg_file: self.config.compiler.force_arg_file,
        }
    }

    /// Compiles the main scope, then the test scope if requested.
    ///
    /// A main failure skips the test scope: there is no point compiling
    /// tests against broken classes.
    pub fn execute_all(&mut self, include_test: bool) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        match self.execute(Scope::Main) {
            Ok(outcome) => {
                report.main = Some(outcome);
                if include_test {
                    match self.execute(Scope::Test) {
                        Ok(outcome) => report.test = Some(outcome),
                        Err(e) => report.error = Some(e),
                    }
                }
            }
            Err(e) => {
                if include_test {
                    self.logger
                        .info("skipping test compilation after main failure");
                }
                report.error = Some(e);
            }
        }
        report
    }

    /// Runs one scope through the configured driver.
    pub fn execute(&mut self, scope: Scope) -> Result<Outcome, ExecutionError> {
        let prep_start = Instant::now();

        let resolved = resolve_scope(&self.config, scope, &self.project_dir);
        std::fs::create_dir_all(&resolved.output_dir).map_err(ExecutionError::wrap)?;
        let output_dir =
            std::fs::canonicalize(&resolved.output_dir).map_err(ExecutionError::wrap)?;

        let sources = self
            .scanner
            .scan(&resolved.source_roots)
            .map_err(ExecutionError::wrap)?;
        if self.logger.debug_enabled() {
            self.logger.debug(&format!(
                "{} scope: {} candidate file(s)",
                scope.name(),
                sources.len()
            ));
            for file in &sources {
                self.logger.debug(&format!("  {}", file.display()));
            }
        }

        let mode = self.config.compiler.recompile_mode;
        if mode == RecompileMode::Incremental {
            self.ensure_bridge();
        }

        let classpath = self.assemble_classpath(scope, &output_dir)?;
        let request = CompileRequest {
            source_roots: resolved.source_roots.clone(),
            output_dir,
            classpath,
            scalac_options: self.config.compiler.scalac_options.clone(),
            javac_options: self.config.compiler.javac_options.clone(),
            compile_order: self.config.compiler.compile_order,
        };

        let prep_ms = prep_start.elapsed().as_millis();
        let compile_start = Instant::now();

        let result = match mode {
            RecompileMode::All => self.run_legacy(LegacyMode::All, &request, &sources),
            RecompileMode::ModifiedOnly => {
                self.run_legacy(LegacyMode::ModifiedOnly, &request, &sources)
            }
            RecompileMode::Incremental => self.run_bridge(scope, &resolved, &request, &sources),
        };

        let compile_ms = compile_start.elapsed().as_millis();
        match result {
            Ok(Outcome::NoSources) => {
                self.logger
                    .info(&format!("{} scope: no source files found", scope.name()));
                Ok(Outcome::NoSources)
            }
            Ok(Outcome::UpToDate) => {
                self.logger
                    .info(&format!("{} scope: nothing to compile", scope.name()));
                Ok(Outcome::UpToDate)
            }
            Ok(Outcome::Compiled(n)) => {
                self.logger.info(&format!(
                    "{} scope: compiled {n} source file(s) in {compile_ms} ms (preparation {prep_ms} ms)",
                    scope.name()
                ));
                Ok(Outcome::Compiled(n))
            }
            Err(DriverError::CompileFailed { .. }) => Err(ExecutionError::CompileFailed {
                scope: scope.name(),
            }),
            Err(other) => Err(ExecutionError::wrap(other)),
        }
    }

    fn run_legacy(
        &mut self,
        mode: LegacyMode,
        request: &CompileRequest,
        sources: &[PathBuf],
    ) -> Result<Outcome, DriverError> {
        let compiler = ScalacCompiler::new(
            self.java_exe.clone(),
            self.config.compiler.jvm_args.clone(),
            self.caller_strategy(),
            None,
            self.logger.clone(),
        );
        let driver = LegacyTimestampDriver::new(mode, self.logger.clone());
        driver.compile(&compiler, request, sources)
    }

    fn run_bridge(
        &mut self,
        scope: Scope,
        resolved: &ResolvedScope,
        request: &CompileRequest,
        sources: &[PathBuf],
    ) -> Result<Outcome, DriverError> {
        let analysis_out = resolved
            .analysis_cache
            .with_file_name(format!("{}.deps.json", scope.name()));
        let strategy = self.caller_strategy();
        let compiler = ScalacCompiler::new(
            self.java_exe.clone(),
            self.config.compiler.jvm_args.clone(),
            strategy,
            Some(analysis_out),
            self.logger.clone(),
        );

        let tool_version = format!("{}+{}", env!("CARGO_PKG_VERSION"), self.scala_version);
        let logger = self.logger.clone();
        let slot = match scope {
            Scope::Main => &mut self.main_driver,
            Scope::Test => &mut self.test_driver,
        };
        let driver = slot.get_or_insert_with(|| {
            BridgeDriver::new(&resolved.analysis_cache, &tool_version, logger)
        });
        driver.compile(&compiler, request, sources)
    }

    /// Resolves the bridge artifact once per orchestrator.
    ///
    /// An unavailable bridge is downgraded to a warning: compiles still run,
    /// they just produce no analysis and pay full recompiles.
    fn ensure_bridge(&mut self) {
        if self.bridge_checked {
            return;
        }
        self.bridge_checked = true;

        let cache = BridgeCache::new(&self.cache_root);
        let builder = RepositoryBridgeBuilder::new(DirRepository::new(&self.repository_root));
        match cache.ensure(
            &self.scala_version,
            ENGINE_VERSION,
            JAVA_CLASS_VERSION,
            &builder,
        ) {
            Ok(jar) => {
                self.logger
                    .debug(&format!("compiler bridge at {}", jar.display()));
                self.bridge_jar = Some(jar);
            }
            Err(e) => {
                self.logger.warn(&format!(
                    "compiler bridge unavailable ({e}); compiling without dependency analysis"
                ));
            }
        }
    }

    /// Assembles the compile classpath for one scope.
    ///
    /// The output directory leads (mixed compiles must see already-compiled
    /// classes), the test scope additionally sees the main output, then the
    /// resolved dependencies in declaration order, then the bridge jar.
    fn assemble_classpath(
        &self,
        scope: Scope,
        output_dir: &Path,
    ) -> Result<Classpath, ExecutionError> {
        let mut builder = ClasspathBuilder::new().add(output_dir);
        if scope == Scope::Test {
            builder = builder.add(self.project_dir.join(&self.config.output.dir));
        }

        let path_resolver = PathResolver::new(&self.project_dir);
        for (key, spec) in &self.config.dependencies {
            match spec {
                scargo_config::DependencySpec::Version { version } => {
                    let (group, artifact) = key.split_once(':').ok_or_else(|| {
                        ConfigError::ValidationError(format!(
                            "dependency key '{key}' is not of the form group:artifact"
                        ))
                    })?;
                    let paths = self
                        .repository
                        .resolve(&Coordinate::new(group, artifact, version))?;
                    builder = builder.add_all(paths);
                }
                scargo_config::DependencySpec::Path { path } => {
                    builder = builder.add(path_resolver.resolve_path(key, Path::new(path))?);
                }
            }
        }

        if let Some(ref jar) = self.bridge_jar {
            builder = builder.add(jar);
        }
        Ok(builder.build())
    }
}

/// Root of the local artifact repository.
fn default_repository_root() -> PathBuf {
    match std::env::var_os("SCARGO_REPOSITORY") {
        Some(root) => PathBuf::from(root),
        None => user_home().join(".scargo").join("repository"),
    }
}

/// Root of the user-level bridge cache.
fn default_cache_root() -> PathBuf {
    match std::env::var_os("SCARGO_CACHE") {
        Some(root) => PathBuf::from(root),
        None => user_home().join(".scargo").join("cache"),
    }
}

fn user_home() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Runs the `scargo compile` command.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let mut config = load_config(&project_dir)?;
    if let Some(mode) = args.mode {
        config.compiler.recompile_mode = mode.to_config();
    }

    let logger = Logger::from_flags(global.quiet, global.verbose);
    let mut orchestrator = Orchestrator::new(config, project_dir, logger)?;
    let report = orchestrator.execute_all(args.test);

    match report.error {
        None => Ok(0),
        Some(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scargo_config::load_config_from_str;
    use std::fs;
    use tempfile::TempDir;

    fn config(extra: &str) -> ProjectConfig {
        load_config_from_str(&format!(
            r#"
[project]
name = "t"
version = "0.1.0"
scala_version = "2.13.5"
{extra}
"#
        ))
        .unwrap()
    }

    fn logger() -> Logger {
        Logger::from_flags(true, false)
    }

    fn backdate(path: &Path) {
        let past = std::time::SystemTime::now() - std::time::Duration::from_secs(120);
        fs::OpenOptions::new()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(past)
            .unwrap();
    }

    fn seed_sources(project: &Path, names: &[&str]) {
        let src = project.join("src/main/scala");
        fs::create_dir_all(&src).unwrap();
        for name in names {
            let path = src.join(name);
            fs::write(&path, format!("object {name}")).unwrap();
            backdate(&path);
        }
    }

    fn orchestrator(project: &Path, cfg: ProjectConfig, java: &str) -> Orchestrator {
        Orchestrator::new(cfg, project.to_path_buf(), logger())
            .unwrap()
            .with_java_exe(java)
            .with_repository(project.join("no-repo"))
            .with_cache_root(project.join("no-cache"))
    }

    #[test]
    fn legacy_cold_build_reports_count() {
        let tmp = TempDir::new().unwrap();
        seed_sources(tmp.path(), &["A.scala", "B.scala", "C.scala"]);
        let cfg = config("[compiler]\nrecompile_mode = \"all\"\n");

        let mut orch = orchestrator(tmp.path(), cfg, "/bin/true");
        let outcome = orch.execute(Scope::Main).unwrap();
        assert_eq!(outcome, Outcome::Compiled(3));

        // The timestamp marker was created beside the output directory.
        let target = tmp.path().join("target");
        let marker = fs::read_dir(&target)
            .unwrap()
            .flatten()
            .find(|e| e.file_name().to_string_lossy().ends_with(".timestamp"));
        assert!(marker.is_some());
    }

    #[test]
    fn no_sources_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let cfg = config("[compiler]\nrecompile_mode = \"all\"\n");
        let mut orch = orchestrator(tmp.path(), cfg, "/bin/true");
        assert_eq!(orch.execute(Scope::Main).unwrap(), Outcome::NoSources);
    }

    #[test]
    fn legacy_noop_after_successful_build() {
        let tmp = TempDir::new().unwrap();
        seed_sources(tmp.path(), &["A.scala"]);
        let cfg = config("[compiler]\nrecompile_mode = \"all\"\n");
        let mut orch = orchestrator(tmp.path(), cfg, "/bin/true");

        orch.execute(Scope::Main).unwrap();
        // A real compiler would have produced class files; stand in for it.
        fs::write(tmp.path().join("target/classes/A.class"), b"\xca\xfe").unwrap();

        assert_eq!(orch.execute(Scope::Main).unwrap(), Outcome::UpToDate);
    }

    #[test]
    fn compile_failure_is_typed_and_skips_tests() {
        let tmp = TempDir::new().unwrap();
        seed_sources(tmp.path(), &["A.scala"]);
        let test_src = tmp.path().join("src/test/scala");
        fs::create_dir_all(&test_src).unwrap();
        fs::write(test_src.join("ATest.scala"), "object ATest").unwrap();

        let cfg = config("[compiler]\nrecompile_mode = \"all\"\n");
        let mut orch = orchestrator(tmp.path(), cfg, "/bin/false");
        let report = orch.execute_all(true);
        assert!(!report.success());
        assert!(matches!(
            report.error,
            Some(ExecutionError::CompileFailed { scope: "main" })
        ));
        assert!(report.test.is_none(), "test scope must be skipped");
    }

    #[test]
    fn test_scope_runs_after_main_success() {
        let tmp = TempDir::new().unwrap();
        seed_sources(tmp.path(), &["A.scala"]);
        let test_src = tmp.path().join("src/test/scala");
        fs::create_dir_all(&test_src).unwrap();
        fs::write(test_src.join("ATest.scala"), "object ATest").unwrap();

        let cfg = config("[compiler]\nrecompile_mode = \"all\"\n");
        let mut orch = orchestrator(tmp.path(), cfg, "/bin/true");
        let report = orch.execute_all(true);
        assert!(report.success());
        assert_eq!(report.main, Some(Outcome::Compiled(1)));
        assert_eq!(report.test, Some(Outcome::Compiled(1)));
        assert!(report.compiled_anything());
    }

    #[test]
    fn missing_dependency_is_fatal() {
        let tmp = TempDir::new().unwrap();
        seed_sources(tmp.path(), &["A.scala"]);
        let cfg = config(
            "[compiler]\nrecompile_mode = \"all\"\n\n[dependencies.\"com.example:gone\"]\nversion = \"1.0\"\n",
        );
        let mut orch = orchestrator(tmp.path(), cfg, "/bin/true");
        let err = orch.execute(Scope::Main).unwrap_err();
        assert!(matches!(err, ExecutionError::Resolve(_)));
        assert!(err.to_string().contains("com.example:gone:1.0"));
    }

    #[test]
    fn path_dependency_lands_on_classpath() {
        let tmp = TempDir::new().unwrap();
        seed_sources(tmp.path(), &["A.scala"]);
        fs::create_dir_all(tmp.path().join("lib")).unwrap();
        fs::write(tmp.path().join("lib/local.jar"), b"PK").unwrap();

        let cfg = config(
            "[compiler]\nrecompile_mode = \"all\"\n\n[dependencies.\"com.example:local\"]\npath = \"lib/local.jar\"\n",
        );
        let orch = orchestrator(tmp.path(), cfg, "/bin/true");
        let out = tmp.path().join("target/classes");
        fs::create_dir_all(&out).unwrap();
        let cp = orch.assemble_classpath(Scope::Main, &out).unwrap();
        assert!(cp
            .entries()
            .iter()
            .any(|p| p.ends_with("lib/local.jar")));
        assert_eq!(cp.entries()[0], out, "output dir must lead");
    }

    #[test]
    fn test_classpath_sees_main_output() {
        let tmp = TempDir::new().unwrap();
        let cfg = config("");
        let orch = orchestrator(tmp.path(), cfg, "/bin/true");
        let out = tmp.path().join("target/test-classes");
        fs::create_dir_all(&out).unwrap();
        let cp = orch.assemble_classpath(Scope::Test, &out).unwrap();
        assert!(cp
            .entries()
            .iter()
            .any(|p| p.ends_with("target/classes")));
    }

    #[test]
    fn invalid_dependency_key_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let cfg = config("[dependencies.\"not-a-coordinate\"]\nversion = \"1.0\"\n");
        let orch = orchestrator(tmp.path(), cfg, "/bin/true");
        let out = tmp.path().join("target/classes");
        fs::create_dir_all(&out).unwrap();
        let err = orch.assemble_classpath(Scope::Main, &out).unwrap_err();
        assert!(matches!(err, ExecutionError::Config(_)));
    }

    #[test]
    fn in_process_entry_point_used_when_fork_disabled() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct CountingEntry(AtomicUsize);
        impl scargo_invoke::MainEntry for CountingEntry {
            fn invoke(&self, _args: &[String]) -> Result<i32, scargo_invoke::InvokeError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(0)
            }
        }

        let tmp = TempDir::new().unwrap();
        seed_sources(tmp.path(), &["A.scala"]);
        let cfg = config("[compiler]\nrecompile_mode = \"all\"\nfork = false\n");
        let entry = Arc::new(CountingEntry(AtomicUsize::new(0)));
        // A bogus java executable proves no process was forked.
        let mut orch =
            orchestrator(tmp.path(), cfg, "/nonexistent/java").with_entry_point(entry.clone());

        let outcome = orch.execute(Scope::Main).unwrap();
        assert_eq!(outcome, Outcome::Compiled(1));
        assert_eq!(entry.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fork_disabled_without_entry_point_falls_back() {
        let tmp = TempDir::new().unwrap();
        seed_sources(tmp.path(), &["A.scala"]);
        let cfg = config("[compiler]\nrecompile_mode = \"all\"\nfork = false\n");
        let mut orch = orchestrator(tmp.path(), cfg, "/bin/true");
        assert_eq!(orch.execute(Scope::Main).unwrap(), Outcome::Compiled(1));
    }

    // Bridge-mode integration: a shell script stands in for the JVM and
    // writes the analysis file the bridge shim would produce.
    #[cfg(unix)]
    #[test]
    fn bridge_mode_second_run_is_up_to_date() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        seed_sources(tmp.path(), &["A.scala", "B.scala"]);

        let calls = tmp.path().join("calls.txt");
        let fake_java = tmp.path().join("fake-java.sh");
        fs::write(
            &fake_java,
            format!(
                r#"#!/bin/sh
echo run >> "{calls}"
out=""
expect=0
for a in "$@"; do
  if [ "$expect" = 1 ]; then out="$a"; expect=0; continue; fi
  [ "$a" = "-analysis-out" ] && expect=1
done
[ -z "$out" ] && exit 0
echo "[" > "$out"
first=1
for a in "$@"; do
  case "$a" in
    *.scala)
      [ "$first" = 0 ] && echo "," >> "$out"
      printf '{{"file": "%s"}}' "$a" >> "$out"
      first=0
      ;;
  esac
done
echo "]" >> "$out"
"#,
                calls = calls.display()
            ),
        )
        .unwrap();
        fs::set_permissions(&fake_java, fs::Permissions::from_mode(0o755)).unwrap();

        let cfg = config("[compiler]\nrecompile_mode = \"incremental\"\n");
        let mut orch = orchestrator(tmp.path(), cfg, fake_java.to_str().unwrap());

        assert_eq!(orch.execute(Scope::Main).unwrap(), Outcome::Compiled(2));
        assert_eq!(orch.execute(Scope::Main).unwrap(), Outcome::UpToDate);

        let runs = fs::read_to_string(&calls).unwrap().lines().count();
        assert_eq!(runs, 1, "the compiler must run exactly once");
    }
}
