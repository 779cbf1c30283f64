//! Forked and in-process invocation strategies behind one contract.

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use scargo_common::{LogLevel, Logger};

use crate::argfile::{needs_arg_file, write_arg_file};
use crate::command::JavaCommand;
use crate::error::InvokeError;

/// Main class of the bootstrap shim that replays an argument file into the
/// real main method. Launched instead of the target class when arguments are
/// spilled.
pub const ARG_FILE_MAIN: &str = "org.scargo.boot.ArgFileMain";

static ARG_FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Classifies one line of compiler output for logging purposes only.
///
/// The substrings mirror what scalac and javac actually print; control flow
/// never depends on this, only the level a line is logged at.
pub fn classify_line(line: &str) -> LogLevel {
    let lower = line.to_lowercase();
    if lower.contains("error") {
        LogLevel::Error
    } else if lower.contains("warn") {
        LogLevel::Warn
    } else {
        LogLevel::Info
    }
}

/// Entry point of a tool loaded into this process.
///
/// This is the single dynamic boundary for in-process invocation: the one
/// place an unknown tool's `main` is located and called. Implementations
/// return the tool's exit code.
pub trait MainEntry: Send + Sync {
    /// Invokes the entry point with the given argument list.
    fn invoke(&self, args: &[String]) -> Result<i32, InvokeError>;
}

/// A handle to a fire-and-forget background process.
///
/// Only supports polling; there is no join or result retrieval. Used solely
/// for the long-lived background compile server.
pub struct SpawnHandle {
    child: Child,
}

impl SpawnHandle {
    /// Returns `true` while the spawned process is still running.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// The OS process id of the spawned child.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }
}

/// The invocation contract shared by all strategies.
///
/// A strategy is selected once at construction and never switched at
/// runtime.
pub trait JavaCaller {
    /// Runs the command to completion.
    ///
    /// Returns `Ok(true)` on exit code 0. On nonzero exit, raises
    /// [`InvokeError::RunFailed`] when `throw_on_failure` is set, otherwise
    /// returns `Ok(false)`.
    fn run(&self, display: &str, throw_on_failure: bool) -> Result<bool, InvokeError>;

    /// Launches the command without waiting for it.
    fn spawn(&self, display: &str) -> Result<SpawnHandle, InvokeError>;
}

/// Runs the command as a forked child process.
///
/// When the combined argument length exceeds the spill threshold (or
/// spilling is forced), arguments are written to a temp file and the
/// bootstrap shim is launched in place of the target class. Child output is
/// pumped by one blocking-read thread per stream and logged line by line.
pub struct ForkedCaller {
    command: JavaCommand,
    force_arg_file: bool,
    logger: Logger,
}

impl ForkedCaller {
    /// Creates a forked caller for the given command.
    pub fn new(command: JavaCommand, force_arg_file: bool, logger: Logger) -> Self {
        Self {
            command,
            force_arg_file,
            logger,
        }
    }

    /// Assembles the OS command, spilling arguments to a file if needed.
    ///
    /// Returns the command plus the spill file path (if one was created) so
    /// the caller can remove it after the process exits.
    fn build_os_command(&self) -> Result<(Command, Option<PathBuf>), InvokeError> {
        let mut cmd = Command::new(&self.command.java_exe);
        cmd.args(&self.command.jvm_args);

        if needs_arg_file(&self.command.args, self.force_arg_file) {
            let path = std::env::temp_dir().join(format!(
                "scargo-args-{}-{}.txt",
                std::process::id(),
                ARG_FILE_COUNTER.fetch_add(1, Ordering::Relaxed)
            ));
            write_arg_file(&path, &self.command.args).map_err(|e| InvokeError::ArgFile {
                path: path.clone(),
                source: e,
            })?;
            cmd.arg(ARG_FILE_MAIN);
            cmd.arg(&self.command.main_class);
            cmd.arg(&path);
            Ok((cmd, Some(path)))
        } else {
            cmd.arg(&self.command.main_class);
            cmd.args(&self.command.args);
            Ok((cmd, None))
        }
    }

    /// Starts a thread that pumps one child stream to the logger.
    ///
    /// The loop blocks on reads and ends at stream EOF; no polling.
    fn pump<R: Read + Send + 'static>(&self, stream: R) -> JoinHandle<()> {
        let logger = self.logger.clone();
        std::thread::spawn(move || {
            let reader = BufReader::new(stream);
            for line in reader.lines().map_while(Result::ok) {
                match classify_line(&line) {
                    LogLevel::Error => logger.error(&line),
                    LogLevel::Warn => logger.warn(&line),
                    _ => logger.info(&line),
                }
            }
        })
    }
}

impl JavaCaller for ForkedCaller {
    fn run(&self, display: &str, throw_on_failure: bool) -> Result<bool, InvokeError> {
        let (mut cmd, arg_file) = self.build_os_command()?;
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        if self.logger.debug_enabled() {
            self.logger.debug(&format!("exec: {}", self.command.render()));
        }

        let mut child = cmd.spawn().map_err(|e| InvokeError::SpawnFailed {
            program: self.command.java_exe.to_string_lossy().into_owned(),
            source: e,
        })?;

        let out_pump = child.stdout.take().map(|s| self.pump(s));
        let err_pump = child.stderr.take().map(|s| self.pump(s));

        let status = child.wait().map_err(InvokeError::Wait);

        for pump in [out_pump, err_pump].into_iter().flatten() {
            let _ = pump.join();
        }
        if let Some(path) = arg_file {
            let _ = std::fs::remove_file(path);
        }

        let status = status?;
        if status.success() {
            Ok(true)
        } else {
            let code = status.code().unwrap_or(-1);
            if throw_on_failure {
                Err(InvokeError::RunFailed {
                    display: display.to_string(),
                    code,
                })
            } else {
                Ok(false)
            }
        }
    }

    fn spawn(&self, display: &str) -> Result<SpawnHandle, InvokeError> {
        let (mut cmd, _arg_file) = self.build_os_command()?;
        // Fire-and-forget: the child owns its lifetime, output is discarded.
        cmd.stdout(Stdio::null()).stderr(Stdio::null());

        self.logger.debug(&format!("spawn: {display}"));

        let child = cmd.spawn().map_err(|e| InvokeError::SpawnFailed {
            program: self.command.java_exe.to_string_lossy().into_owned(),
            source: e,
        })?;
        Ok(SpawnHandle { child })
    }
}

/// Runs the command by calling a [`MainEntry`] in this process.
///
/// Faster than forking (no JVM startup) but cannot honor JVM arguments and
/// cannot be killed independently of the host.
pub struct InProcessCaller {
    command: JavaCommand,
    entry: Box<dyn MainEntry>,
    logger: Logger,
}

impl InProcessCaller {
    /// Creates an in-process caller dispatching to `entry`.
    pub fn new(command: JavaCommand, entry: Box<dyn MainEntry>, logger: Logger) -> Self {
        Self {
            command,
            entry,
            logger,
        }
    }
}

impl JavaCaller for InProcessCaller {
    fn run(&self, display: &str, throw_on_failure: bool) -> Result<bool, InvokeError> {
        if !self.command.jvm_args.is_empty() {
            self.logger.warn(&format!(
                "jvm arguments {:?} are ignored for in-process invocation",
                self.command.jvm_args
            ));
        }

        let code = self.entry.invoke(&self.command.args)?;
        if code == 0 {
            Ok(true)
        } else if throw_on_failure {
            Err(InvokeError::RunFailed {
                display: display.to_string(),
                code,
            })
        } else {
            Ok(false)
        }
    }

    fn spawn(&self, _display: &str) -> Result<SpawnHandle, InvokeError> {
        Err(InvokeError::SpawnUnsupported)
    }
}
