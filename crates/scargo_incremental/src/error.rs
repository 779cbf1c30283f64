//! Error types for the incremental drivers.

use std::path::PathBuf;

/// Error reported by a [`Compiler`](crate::driver::Compiler) implementation.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The compiler could not be invoked at all (process-level failure).
    ///
    /// Distinct from a compile that ran and reported errors, which comes
    /// back as an unsuccessful [`CompileResult`](crate::driver::CompileResult).
    #[error("compiler invocation failed: {source}")]
    Invocation {
        /// The underlying invocation error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CompileError {
    /// Wraps an invocation-level failure.
    pub fn invocation(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Invocation {
            source: Box::new(source),
        }
    }
}

/// Errors surfaced by the incremental drivers.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The compiler ran and reported errors.
    ///
    /// Persistent state is left so the failed files stay dirty: the legacy
    /// driver's timestamp is not advanced, and the bridge driver keeps the
    /// failed files' previous hashes.
    #[error("compilation of {files} file(s) failed")]
    CompileFailed {
        /// How many files were handed to the failed invocation.
        files: usize,
    },

    /// The compiler could not be invoked.
    #[error(transparent)]
    Compiler(#[from] CompileError),

    /// Persistent driver state could not be written.
    ///
    /// Reads of state files never produce this: unreadable state degrades
    /// to a full recompile instead.
    #[error("failed to persist incremental state at {path}: {source}")]
    State {
        /// The state file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_failed_display() {
        let err = DriverError::CompileFailed { files: 3 };
        assert_eq!(err.to_string(), "compilation of 3 file(s) failed");
    }

    #[test]
    fn invocation_preserves_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "java not found");
        let err = CompileError::invocation(io);
        assert!(err.to_string().contains("java not found"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn state_display() {
        let err = DriverError::State {
            path: PathBuf::from("/proj/target/analysis/main.bin"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("main.bin"));
    }
}
