//! Background compile-server lifecycle.
//!
//! The server is a long-lived JVM started fire-and-forget; a sentinel tag
//! file marks it as running. Startup pings tolerate connection failures
//! ("keep waiting", not fatal) because a concurrently-started server answers
//! eventually or not at all. Shutdown is best-effort: the stop request and
//! tag-file removal both swallow failures, since there is nothing useful to
//! do with them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use scargo_common::Logger;
use scargo_config::load_config;
use scargo_invoke::{ForkedCaller, JavaCaller, JavaCommandBuilder};

use crate::compiler::java_executable;
use crate::project::resolve_project_root;
use crate::{GlobalArgs, ServerAction};

/// Main class of the resident compile server.
pub const SERVER_MAIN: &str = "scala.tools.nsc.CompileServer";

/// Main class of the compile-server client shim.
pub const CLIENT_MAIN: &str = "scala.tools.nsc.CompileClient";

/// How many times to ping a freshly-started server before giving up.
const READY_ATTEMPTS: u32 = 10;

/// Manages one compile server identified by its tag file.
pub struct CompileServer {
    tag_file: PathBuf,
    java_exe: PathBuf,
    jvm_args: Vec<String>,
    logger: Logger,
}

impl CompileServer {
    /// Creates a manager for the server tagged by `tag_file`.
    pub fn new(
        tag_file: PathBuf,
        java_exe: PathBuf,
        jvm_args: Vec<String>,
        logger: Logger,
    ) -> Self {
        Self {
            tag_file,
            java_exe,
            jvm_args,
            logger,
        }
    }

    /// Returns `true` if the tag file marks a server as running.
    pub fn is_tagged(&self) -> bool {
        self.tag_file.exists()
    }

    /// Starts the server unless one is already tagged as running.
    ///
    /// Returns `true` if a new server was spawned. After spawning, the
    /// client pings until the server answers; ping failures while starting
    /// mean "keep waiting" and, after the attempts run out, a warning rather
    /// than an error.
    pub fn start(&self) -> Result<bool, Box<dyn std::error::Error>> {
        if self.is_tagged() {
            self.logger.info("compile server already running");
            return Ok(false);
        }

        let command = JavaCommandBuilder::new(&self.java_exe, SERVER_MAIN)
            .jvm_args(self.jvm_args.iter().cloned())
            .build();
        let caller = ForkedCaller::new(command, false, self.logger.clone());
        let handle = caller.spawn("compile server")?;

        if let Some(parent) = self.tag_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.tag_file, handle.pid().to_string())?;

        if self.wait_until_ready() {
            self.logger.info("compile server started");
        } else {
            self.logger
                .warn("compile server did not answer yet; it may still be starting");
        }
        Ok(true)
    }

    /// Asks the server to shut down and clears the tag. Best-effort.
    pub fn stop(&self) {
        let command = JavaCommandBuilder::new(&self.java_exe, CLIENT_MAIN)
            .arg("-shutdown")
            .build();
        let caller = ForkedCaller::new(command, false, self.logger.clone());
        match caller.run("compile server shutdown", false) {
            Ok(true) => self.logger.info("compile server stopped"),
            Ok(false) => self.logger.warn("compile server refused the shutdown request"),
            Err(e) => self
                .logger
                .warn(&format!("could not reach compile server: {e}")),
        }

        if let Err(e) = std::fs::remove_file(&self.tag_file) {
            if e.kind() != std::io::ErrorKind::NotFound {
                self.logger
                    .warn(&format!("could not remove server tag file: {e}"));
            }
        }
    }

    /// Pings the server through the client until it answers.
    fn wait_until_ready(&self) -> bool {
        for _ in 0..READY_ATTEMPTS {
            let command = JavaCommandBuilder::new(&self.java_exe, CLIENT_MAIN).build();
            let caller = ForkedCaller::new(command, false, self.logger.clone());
            // A connection failure here just means the server is not up yet.
            if let Ok(true) = caller.run("compile server ping", false) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        false
    }
}

/// Returns the tag-file path for a project.
pub fn tag_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join("target").join("compile-server.tag")
}

/// Runs the `scargo server` command.
pub fn run(action: &ServerAction, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = load_config(&project_dir)?;
    let logger = Logger::from_flags(global.quiet, global.verbose);

    let server = CompileServer::new(
        tag_file_path(&project_dir),
        java_executable(),
        config.compiler.jvm_args.clone(),
        logger,
    );

    match action {
        ServerAction::Start => {
            server.start()?;
            Ok(0)
        }
        ServerAction::Stop => {
            server.stop();
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn server(tmp: &TempDir, java: &str) -> CompileServer {
        CompileServer::new(
            tag_file_path(tmp.path()),
            PathBuf::from(java),
            vec![],
            Logger::from_flags(true, false),
        )
    }

    #[test]
    fn start_creates_tag_file() {
        let tmp = TempDir::new().unwrap();
        let server = server(&tmp, "/bin/true");
        assert!(!server.is_tagged());
        assert!(server.start().unwrap());
        assert!(server.is_tagged());
    }

    #[test]
    fn second_start_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let server = server(&tmp, "/bin/true");
        assert!(server.start().unwrap());
        assert!(!server.start().unwrap());
    }

    #[test]
    fn stop_removes_tag_file() {
        let tmp = TempDir::new().unwrap();
        let server = server(&tmp, "/bin/true");
        server.start().unwrap();
        server.stop();
        assert!(!server.is_tagged());
    }

    #[test]
    fn stop_without_server_is_harmless() {
        let tmp = TempDir::new().unwrap();
        // The client cannot connect and the tag does not exist; both are
        // swallowed.
        let server = server(&tmp, "/bin/false");
        server.stop();
        assert!(!server.is_tagged());
    }

    #[test]
    fn unreachable_server_start_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        // /bin/false makes every ping fail; start still succeeds with a
        // warning because the server may just be slow.
        let server = CompileServer::new(
            tag_file_path(tmp.path()),
            PathBuf::from("/bin/false"),
            vec![],
            Logger::from_flags(true, false),
        );
        assert!(server.start().unwrap());
        assert!(server.is_tagged());
    }
}
