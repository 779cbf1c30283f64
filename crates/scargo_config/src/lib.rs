//! Parsing and validation of `scargo.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a
//! strongly-typed [`ProjectConfig`], plus per-scope resolution that turns the
//! raw configuration into absolute main/test compile settings.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use resolve::{resolve_scope, ResolvedScope, Scope};
pub use types::*;
