//! `scargo watch` — the continuous compile loop.
//!
//! Re-runs the orchestrator forever (or once with `--once`), sleeping a
//! longer interval after a no-op cycle and a shorter one after a compile to
//! catch fast-follow edits. The test scope runs as the post-compile hook and
//! only when the main compile had no errors. A stop flag checked between
//! cycles ends the loop cleanly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use scargo_common::Logger;
use scargo_config::{load_config, WatchConfig};

use crate::compile::Orchestrator;
use crate::project::resolve_project_root;
use crate::{GlobalArgs, WatchArgs};

/// Runs the `scargo watch` command.
pub fn run(args: &WatchArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = load_config(&project_dir)?;
    let logger = Logger::from_flags(global.quiet, global.verbose);

    let settings = config.watch.clone();
    let include_test = args.test || settings.run_tests_after_compile;

    let mut orchestrator = Orchestrator::new(config, project_dir, logger.clone())?;
    let stop = AtomicBool::new(false);
    let failed_cycles = watch_loop(
        &mut orchestrator,
        &settings,
        args.once,
        include_test,
        &stop,
        &logger,
    );

    Ok(if failed_cycles == 0 { 0 } else { 1 })
}

/// The loop itself, separated from CLI plumbing so it can be driven directly.
///
/// Returns the number of failed cycles. Failures are recorded and the loop
/// continues; only `once` or the stop flag end it.
pub fn watch_loop(
    orchestrator: &mut Orchestrator,
    settings: &WatchConfig,
    once: bool,
    include_test: bool,
    stop: &AtomicBool,
    logger: &Logger,
) -> u64 {
    let mut failed_cycles = 0u64;
    loop {
        let report = orchestrator.execute_all(include_test);
        let compiled = report.compiled_anything();

        if let Some(e) = report.error {
            failed_cycles += 1;
            logger.error(&format!("compile cycle failed: {e}"));
        }

        if once || stop.load(Ordering::Relaxed) {
            break;
        }

        let sleep_ms = if compiled {
            settings.interval_ms
        } else {
            settings.idle_interval_ms
        };
        std::thread::sleep(Duration::from_millis(sleep_ms));

        if stop.load(Ordering::Relaxed) {
            break;
        }
    }
    failed_cycles
}
