//! Error types for configuration loading and validation.

use scargo_common::VersionParseError;

/// Errors that can occur when loading or validating a `scargo.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The configured compiler version string is unparseable.
    #[error("invalid compiler version: {0}")]
    InvalidVersion(#[from] VersionParseError),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
