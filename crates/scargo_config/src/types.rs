//! Configuration types deserialized from `scargo.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The top-level project configuration parsed from `scargo.toml`.
///
/// Contains project metadata, source-set definitions, compiler settings,
/// output locations, library dependencies, and continuous-compile settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, version, compiler version).
    pub project: ProjectMeta,
    /// Source roots and file filters.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Compiler invocation settings.
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Output directory layout.
    #[serde(default)]
    pub output: OutputConfig,
    /// Library dependencies, keyed by `group:artifact` coordinate.
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,
    /// Continuous-compile (watch) settings.
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Core project metadata required in every `scargo.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// The Scala compiler version, e.g. `"2.13.5"`.
    pub scala_version: String,
}

/// Source roots and include/exclude filters.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// Main source root directories, relative to the project root.
    #[serde(default = "default_main_roots")]
    pub roots: Vec<String>,
    /// Test source root directories, relative to the project root.
    #[serde(default = "default_test_roots")]
    pub test_roots: Vec<String>,
    /// Include glob patterns applied to every root.
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    /// Exclude glob patterns applied to every root.
    #[serde(default)]
    pub excludes: Vec<String>,
    /// Whether `.java` sources are forwarded to the Scala compiler.
    #[serde(default)]
    pub send_java_to_compiler: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            roots: default_main_roots(),
            test_roots: default_test_roots(),
            includes: default_includes(),
            excludes: Vec::new(),
            send_java_to_compiler: false,
        }
    }
}

fn default_main_roots() -> Vec<String> {
    vec!["src/main/scala".to_string()]
}

fn default_test_roots() -> Vec<String> {
    vec!["src/test/scala".to_string()]
}

fn default_includes() -> Vec<String> {
    vec!["**/*.scala".to_string()]
}

/// Which recompilation driver decides what to rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecompileMode {
    /// Any modified file triggers recompilation of the entire source set.
    All,
    /// Dependency-graph-based incremental compilation through the bridge.
    Incremental,
    /// Recompile only the modified files (legacy behavior).
    ModifiedOnly,
}

impl Default for RecompileMode {
    fn default() -> Self {
        RecompileMode::Incremental
    }
}

/// Order in which Java and Scala sources of a mixed set are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompileOrder {
    /// Java and Scala sources are handed to the compiler together.
    Mixed,
    /// Java sources are compiled before Scala sources.
    JavaThenScala,
    /// Scala sources are compiled before Java sources.
    ScalaThenJava,
}

impl Default for CompileOrder {
    fn default() -> Self {
        CompileOrder::Mixed
    }
}

/// Compiler invocation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    /// Which recompilation driver to use.
    #[serde(default)]
    pub recompile_mode: RecompileMode,
    /// Additional options passed to scalac.
    #[serde(default)]
    pub scalac_options: Vec<String>,
    /// Additional options passed to javac.
    #[serde(default)]
    pub javac_options: Vec<String>,
    /// Mixed-source compile order.
    #[serde(default)]
    pub compile_order: CompileOrder,
    /// Whether the compiler runs in a forked child process.
    #[serde(default = "default_fork")]
    pub fork: bool,
    /// JVM arguments for the forked compiler process.
    #[serde(default)]
    pub jvm_args: Vec<String>,
    /// Always spill compiler arguments to a file, regardless of length.
    #[serde(default)]
    pub force_arg_file: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            recompile_mode: RecompileMode::default(),
            scalac_options: Vec::new(),
            javac_options: Vec::new(),
            compile_order: CompileOrder::default(),
            fork: default_fork(),
            jvm_args: Vec::new(),
            force_arg_file: false,
        }
    }
}

fn default_fork() -> bool {
    true
}

/// Output directory layout, relative to the project root.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Main class-file output directory.
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Test class-file output directory.
    #[serde(default = "default_test_output_dir")]
    pub test_dir: String,
    /// Directory holding incremental analysis cache files.
    #[serde(default = "default_analysis_dir")]
    pub analysis_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            test_dir: default_test_output_dir(),
            analysis_dir: default_analysis_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "target/classes".to_string()
}

fn default_test_output_dir() -> String {
    "target/test-classes".to_string()
}

fn default_analysis_dir() -> String {
    "target/analysis".to_string()
}

/// Specification of a library dependency.
///
/// Uses serde's untagged enum to distinguish repository and path sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    /// A dependency resolved through the artifact repository.
    Version {
        /// The version requirement string.
        version: String,
    },
    /// A local filesystem path to a jar or class directory.
    Path {
        /// The filesystem path to the dependency.
        path: String,
    },
}

/// Continuous-compile loop settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Sleep after a cycle that compiled something, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Sleep after a no-op cycle, in milliseconds.
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,
    /// Run the test scope after each successful main compile.
    #[serde(default)]
    pub run_tests_after_compile: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            idle_interval_ms: default_idle_interval_ms(),
            run_tests_after_compile: false,
        }
    }
}

fn default_interval_ms() -> u64 {
    500
}

fn default_idle_interval_ms() -> u64 {
    2500
}
