//! scargo CLI — the command-line interface for the scargo Scala build driver.
//!
//! Provides `scargo compile` for one-shot (incremental) compilation,
//! `scargo watch` for continuous compile-on-change loops, `scargo server`
//! for managing the background compile server, and `scargo clean` for
//! removing build outputs and incremental state.

#![warn(missing_docs)]

mod clean;
mod compile;
mod compiler;
mod project;
mod server;
mod watch;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// scargo — an incremental Scala/Java build driver.
#[derive(Parser, Debug)]
#[command(name = "scargo", version, about = "scargo Scala build driver")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `scargo.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the main (and optionally test) sources.
    Compile(CompileArgs),
    /// Recompile continuously whenever sources change.
    Watch(WatchArgs),
    /// Manage the background compile server.
    Server {
        /// The server action to perform.
        #[command(subcommand)]
        action: ServerAction,
    },
    /// Remove build outputs and incremental state.
    Clean,
}

/// Arguments for the `scargo compile` subcommand.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Also compile the test sources.
    #[arg(short, long)]
    pub test: bool,

    /// Override the configured recompilation mode.
    #[arg(long, value_enum)]
    pub mode: Option<CliRecompileMode>,
}

/// Arguments for the `scargo watch` subcommand.
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Run a single cycle instead of looping forever.
    #[arg(long)]
    pub once: bool,

    /// Also compile the test sources each cycle.
    #[arg(short, long)]
    pub test: bool,
}

/// Compile server actions.
#[derive(Subcommand, Debug)]
pub enum ServerAction {
    /// Start the background compile server if it is not already running.
    Start,
    /// Ask the background compile server to shut down.
    Stop,
}

/// Recompilation mode names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliRecompileMode {
    /// Any change recompiles the entire source set.
    All,
    /// Dependency-graph-based incremental compilation.
    Incremental,
    /// Recompile only the modified files (legacy behavior).
    ModifiedOnly,
}

impl CliRecompileMode {
    /// Maps the CLI name onto the configuration enum.
    pub fn to_config(self) -> scargo_config::RecompileMode {
        match self {
            CliRecompileMode::All => scargo_config::RecompileMode::All,
            CliRecompileMode::Incremental => scargo_config::RecompileMode::Incremental,
            CliRecompileMode::ModifiedOnly => scargo_config::RecompileMode::ModifiedOnly,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Compile(ref args) => compile::run(args, &global),
        Command::Watch(ref args) => watch::run(args, &global),
        Command::Server { ref action } => server::run(action, &global),
        Command::Clean => clean::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
