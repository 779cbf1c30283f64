//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use scargo_common::VersionNumber;
use std::path::Path;

/// Loads and validates a `scargo.toml` configuration from a project directory.
///
/// Reads `<project_dir>/scargo.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("scargo.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `scargo.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.scala_version.is_empty() {
        return Err(ConfigError::MissingField(
            "project.scala_version".to_string(),
        ));
    }
    // An unparseable version is a fatal configuration error, caught here
    // rather than at first use.
    VersionNumber::parse(&config.project.scala_version)?;

    if config.sources.roots.is_empty() {
        return Err(ConfigError::ValidationError(
            "sources.roots must not be empty".to_string(),
        ));
    }
    if config.watch.interval_ms == 0 || config.watch.idle_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "watch intervals must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompileOrder, DependencySpec, RecompileMode};

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "hello"
version = "0.1.0"
scala_version = "2.13.5"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "hello");
        assert_eq!(config.project.scala_version, "2.13.5");
        assert_eq!(config.sources.roots, vec!["src/main/scala"]);
        assert_eq!(config.compiler.recompile_mode, RecompileMode::Incremental);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "server"
version = "1.2.0"
scala_version = "2.12.10"

[sources]
roots = ["src/main/scala", "src/main/generated"]
test_roots = ["src/test/scala"]
includes = ["**/*.scala"]
excludes = ["**/Broken*.scala"]
send_java_to_compiler = true

[compiler]
recompile_mode = "all"
scalac_options = ["-deprecation", "-feature"]
javac_options = ["-g"]
compile_order = "java-then-scala"
fork = false
jvm_args = ["-Xmx2g"]
force_arg_file = true

[output]
dir = "out/classes"
test_dir = "out/test-classes"
analysis_dir = "out/analysis"

[dependencies."org.scala-lang:scala-library"]
version = "2.12.10"

[dependencies."com.example:local-lib"]
path = "lib/local-lib.jar"

[watch]
interval_ms = 250
idle_interval_ms = 5000
run_tests_after_compile = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.sources.roots.len(), 2);
        assert!(config.sources.send_java_to_compiler);
        assert_eq!(config.compiler.recompile_mode, RecompileMode::All);
        assert_eq!(config.compiler.compile_order, CompileOrder::JavaThenScala);
        assert!(!config.compiler.fork);
        assert_eq!(config.compiler.jvm_args, vec!["-Xmx2g"]);
        assert_eq!(config.output.dir, "out/classes");
        assert_eq!(config.dependencies.len(), 2);
        match &config.dependencies["org.scala-lang:scala-library"] {
            DependencySpec::Version { version } => assert_eq!(version, "2.12.10"),
            other => panic!("expected version spec, got {other:?}"),
        }
        match &config.dependencies["com.example:local-lib"] {
            DependencySpec::Path { path } => assert_eq!(path, "lib/local-lib.jar"),
            other => panic!("expected path spec, got {other:?}"),
        }
        assert_eq!(config.watch.interval_ms, 250);
        assert!(config.watch.run_tests_after_compile);
    }

    #[test]
    fn reject_empty_name() {
        let toml = r#"
[project]
name = ""
version = "0.1.0"
scala_version = "2.13.5"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn reject_bad_scala_version() {
        let toml = r#"
[project]
name = "hello"
version = "0.1.0"
scala_version = "latest"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVersion(_)));
    }

    #[test]
    fn reject_empty_roots() {
        let toml = r#"
[project]
name = "hello"
version = "0.1.0"
scala_version = "2.13.5"

[sources]
roots = []
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn reject_zero_watch_interval() {
        let toml = r#"
[project]
name = "hello"
version = "0.1.0"
scala_version = "2.13.5"

[watch]
interval_ms = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn reject_malformed_toml() {
        let err = load_config_from_str("not valid toml {{{").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("scargo.toml"),
            "[project]\nname = \"t\"\nversion = \"0.1.0\"\nscala_version = \"2.13.5\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.name, "t");
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
