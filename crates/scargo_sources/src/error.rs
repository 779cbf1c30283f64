//! Error types for scanning and artifact resolution.

use std::path::PathBuf;

/// Errors that can occur while building filters or walking source roots.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// An include or exclude glob pattern failed to compile.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Description of the failure.
        reason: String,
    },

    /// An I/O error occurred while walking an existing source root.
    #[error("failed to scan {path}: {source}")]
    Io {
        /// The directory that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors surfaced by the artifact-resolver boundary.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The requested coordinate does not exist in the repository.
    ///
    /// The coordinate is carried for diagnosis; this is fatal unless the
    /// caller is probing for an optional dependency.
    #[error("artifact not found: {coordinate}")]
    NotFound {
        /// The requested `group:artifact:version` coordinate.
        coordinate: String,
    },

    /// An I/O error occurred while probing the repository.
    #[error("repository I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pattern_display() {
        let err = ScanError::InvalidPattern {
            pattern: "**[".to_string(),
            reason: "unclosed character class".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("**["));
        assert!(msg.contains("unclosed"));
    }

    #[test]
    fn not_found_carries_coordinate() {
        let err = ResolveError::NotFound {
            coordinate: "org.scala-lang:scala-library:2.13.5".to_string(),
        };
        assert!(err.to_string().contains("scala-library:2.13.5"));
    }
}
