//! `scargo clean` — remove build outputs and incremental state.

use std::path::Path;

use scargo_common::Logger;
use scargo_config::{load_config, resolve_scope, ProjectConfig, Scope};

use crate::project::resolve_project_root;
use crate::server::tag_file_path;
use crate::GlobalArgs;

/// Runs the `scargo clean` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = load_config(&project_dir)?;
    let logger = Logger::from_flags(global.quiet, global.verbose);
    clean_project(&config, &project_dir, &logger)?;
    Ok(0)
}

/// Removes output directories, timestamp markers, and analysis state.
///
/// Missing pieces are skipped silently; a clean of a clean project is a
/// no-op.
pub fn clean_project(
    config: &ProjectConfig,
    project_dir: &Path,
    logger: &Logger,
) -> Result<(), Box<dyn std::error::Error>> {
    for scope in [Scope::Main, Scope::Test] {
        let resolved = resolve_scope(config, scope, project_dir);
        remove_dir(&resolved.output_dir);
        remove_markers(&resolved.output_dir);
    }

    remove_dir(&project_dir.join(&config.output.analysis_dir));
    let _ = std::fs::remove_file(tag_file_path(project_dir));

    logger.info("cleaned build outputs and incremental state");
    Ok(())
}

fn remove_dir(dir: &Path) {
    let _ = std::fs::remove_dir_all(dir);
}

/// Deletes the timestamp markers that live beside an output directory.
///
/// Markers are named `<dirname>.<hash>.timestamp`, so every file with that
/// prefix and suffix belongs to this output directory.
fn remove_markers(output_dir: &Path) {
    let Some(parent) = output_dir.parent() else {
        return;
    };
    let Some(name) = output_dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return;
    };
    let Ok(entries) = std::fs::read_dir(parent) else {
        return;
    };
    let prefix = format!("{name}.");
    for entry in entries.flatten() {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with(&prefix) && file_name.ends_with(".timestamp") {
            let _ = std::fs::remove_file(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scargo_config::load_config_from_str;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> ProjectConfig {
        load_config_from_str(
            r#"
[project]
name = "t"
version = "0.1.0"
scala_version = "2.13.5"
"#,
        )
        .unwrap()
    }

    fn logger() -> Logger {
        Logger::from_flags(true, false)
    }

    #[test]
    fn removes_outputs_markers_and_analysis() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("target");
        fs::create_dir_all(target.join("classes")).unwrap();
        fs::create_dir_all(target.join("test-classes")).unwrap();
        fs::create_dir_all(target.join("analysis")).unwrap();
        fs::write(target.join("classes/A.class"), b"\xca\xfe").unwrap();
        fs::write(target.join("classes.abcd1234.timestamp"), b"").unwrap();
        fs::write(target.join("test-classes.abcd1234.timestamp"), b"").unwrap();
        fs::write(target.join("analysis/main.bin"), b"data").unwrap();
        fs::write(target.join("compile-server.tag"), b"123").unwrap();

        clean_project(&config(), tmp.path(), &logger()).unwrap();

        assert!(!target.join("classes").exists());
        assert!(!target.join("test-classes").exists());
        assert!(!target.join("classes.abcd1234.timestamp").exists());
        assert!(!target.join("test-classes.abcd1234.timestamp").exists());
        assert!(!target.join("analysis").exists());
        assert!(!target.join("compile-server.tag").exists());
    }

    #[test]
    fn unrelated_files_survive() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("target");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("notes.txt"), b"keep me").unwrap();
        fs::write(target.join("otherdir.abcd.timestamp"), b"").unwrap();

        clean_project(&config(), tmp.path(), &logger()).unwrap();

        assert!(target.join("notes.txt").exists());
        // A marker for a directory we do not own is left alone.
        assert!(target.join("otherdir.abcd.timestamp").exists());
    }

    #[test]
    fn clean_twice_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        clean_project(&config(), tmp.path(), &logger()).unwrap();
        clean_project(&config(), tmp.path(), &logger()).unwrap();
    }
}
