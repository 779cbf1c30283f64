//! Error types for process invocation.

use std::path::PathBuf;

/// Errors that can occur while launching or running a compiler process.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// The child process could not be started at all.
    #[error("cannot start process '{program}': {source}")]
    SpawnFailed {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The invoked program exited with a nonzero status and the caller
    /// requested failure propagation.
    #[error("{display} failed with exit code {code}")]
    RunFailed {
        /// Human-readable description of what was running.
        display: String,
        /// The child's exit code (or -1 if terminated by signal).
        code: i32,
    },

    /// An I/O error occurred while writing or reading an argument file.
    #[error("argument file I/O error at {path}: {source}")]
    ArgFile {
        /// The argument file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An I/O error occurred while waiting on the child process.
    #[error("failed waiting for child process: {0}")]
    Wait(#[source] std::io::Error),

    /// `spawn` was requested on a strategy that cannot detach.
    #[error("in-process invocation cannot spawn a background process")]
    SpawnUnsupported,

    /// The in-process entry point reported a failure.
    #[error("in-process entry point failed: {reason}")]
    EntryFailed {
        /// Description of the failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_failed_display() {
        let err = InvokeError::RunFailed {
            display: "scalac".to_string(),
            code: 1,
        };
        assert_eq!(err.to_string(), "scalac failed with exit code 1");
    }

    #[test]
    fn spawn_failed_display() {
        let err = InvokeError::SpawnFailed {
            program: "/opt/jdk/bin/java".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/opt/jdk/bin/java"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn spawn_unsupported_display() {
        assert!(InvokeError::SpawnUnsupported
            .to_string()
            .contains("in-process"));
    }
}
