//! Incremental compilation drivers.
//!
//! This crate decides, across repeated invocations, which source files must
//! be recompiled. Two drivers share one contract: the legacy scheme persists
//! a single last-successful-compile timestamp per output directory, while
//! the bridge driver maintains a per-file dependency analysis and recompiles
//! the affected closure of each change. Both err on the side of recompiling
//! too much, never too little.

#![warn(missing_docs)]

pub mod analysis;
pub mod bridge;
pub mod bridge_cache;
pub mod driver;
pub mod error;
pub mod timestamp;

pub use analysis::{AnalysisStore, ChangeSet, FileAnalysis};
pub use bridge::BridgeDriver;
pub use bridge_cache::{BridgeBuilder, BridgeCache};
pub use driver::{CompileRequest, CompileResult, Compiler, Outcome, SourceAnalysis};
pub use error::{CompileError, DriverError};
pub use timestamp::{LegacyMode, LegacyTimestampDriver};
