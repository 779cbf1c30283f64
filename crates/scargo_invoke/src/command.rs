//! Immutable JVM command construction.
//!
//! Commands are accumulated through [`JavaCommandBuilder`] and frozen into a
//! [`JavaCommand`] before execution, so nothing can alter the argument list
//! between "build command" and "execute command".

use std::path::{Path, PathBuf};

/// Accumulates the pieces of a JVM invocation.
#[derive(Debug, Clone)]
pub struct JavaCommandBuilder {
    java_exe: PathBuf,
    main_class: String,
    jvm_args: Vec<String>,
    args: Vec<String>,
}

impl JavaCommandBuilder {
    /// Starts a command for the given Java executable and main class.
    pub fn new(java_exe: impl Into<PathBuf>, main_class: impl Into<String>) -> Self {
        Self {
            java_exe: java_exe.into(),
            main_class: main_class.into(),
            jvm_args: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Appends one JVM argument (before the main class).
    pub fn jvm_arg(mut self, arg: impl Into<String>) -> Self {
        self.jvm_args.push(arg.into());
        self
    }

    /// Appends several JVM arguments.
    pub fn jvm_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.jvm_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends one program argument (after the main class).
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several program arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends a `key value` option pair, e.g. `-d /out/classes`.
    pub fn option(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.arg(key).arg(value)
    }

    /// Freezes the accumulated pieces into an immutable [`JavaCommand`].
    pub fn build(self) -> JavaCommand {
        JavaCommand {
            java_exe: self.java_exe,
            main_class: self.main_class,
            jvm_args: self.jvm_args,
            args: self.args,
        }
    }
}

/// A finalized JVM invocation: `java <jvm_args> <main_class> <args>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaCommand {
    /// Path to the `java` executable.
    pub java_exe: PathBuf,
    /// The main class to run.
    pub main_class: String,
    /// Arguments for the JVM itself.
    pub jvm_args: Vec<String>,
    /// Arguments for the main class.
    pub args: Vec<String>,
}

impl JavaCommand {
    /// Returns the Java executable path.
    pub fn java_exe(&self) -> &Path {
        &self.java_exe
    }

    /// Renders the full command line for debug logging.
    pub fn render(&self) -> String {
        let mut parts = vec![self.java_exe.to_string_lossy().into_owned()];
        parts.extend(self.jvm_args.iter().cloned());
        parts.push(self.main_class.clone());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_in_declaration_order() {
        let cmd = JavaCommandBuilder::new("/opt/jdk/bin/java", "scala.tools.nsc.Main")
            .jvm_arg("-Xmx1g")
            .option("-classpath", "/lib/scala-library.jar")
            .option("-d", "/out/classes")
            .arg("/src/Main.scala")
            .build();

        assert_eq!(cmd.java_exe, PathBuf::from("/opt/jdk/bin/java"));
        assert_eq!(cmd.main_class, "scala.tools.nsc.Main");
        assert_eq!(cmd.jvm_args, vec!["-Xmx1g"]);
        assert_eq!(
            cmd.args,
            vec![
                "-classpath",
                "/lib/scala-library.jar",
                "-d",
                "/out/classes",
                "/src/Main.scala"
            ]
        );
    }

    #[test]
    fn bulk_args() {
        let cmd = JavaCommandBuilder::new("java", "Main")
            .jvm_args(["-Xmx1g", "-Xss4m"])
            .args(["a", "b"])
            .build();
        assert_eq!(cmd.jvm_args.len(), 2);
        assert_eq!(cmd.args, vec!["a", "b"]);
    }

    #[test]
    fn render_full_line() {
        let cmd = JavaCommandBuilder::new("java", "Main")
            .jvm_arg("-Xmx1g")
            .arg("hello")
            .build();
        assert_eq!(cmd.render(), "java -Xmx1g Main hello");
    }

    #[test]
    fn no_args() {
        let cmd = JavaCommandBuilder::new("java", "Main").build();
        assert!(cmd.jvm_args.is_empty());
        assert!(cmd.args.is_empty());
        assert_eq!(cmd.render(), "java Main");
    }
}
