//! JVM process invocation.
//!
//! Builds compiler command lines and executes them either as a forked child
//! process (with argument spill files to dodge OS command-length limits) or
//! in-process through a narrow entry-point capability. Both strategies share
//! one contract, selected once at construction.

#![warn(missing_docs)]

pub mod argfile;
pub mod command;
pub mod error;
pub mod invoker;

pub use argfile::{read_arg_file, write_arg_file, ARG_SPILL_THRESHOLD};
pub use command::{JavaCommand, JavaCommandBuilder};
pub use error::InvokeError;
pub use invoker::{classify_line, ForkedCaller, InProcessCaller, JavaCaller, MainEntry, SpawnHandle};
