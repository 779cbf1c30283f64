//! Leveled logging for the build driver.
//!
//! The host build tool hands us a logger with `debug`/`info`/`warn`/`error`
//! levels and level-enabled queries; this is our standalone equivalent.
//! Messages go to stderr with a level prefix, gated by the configured
//! threshold.

use std::fmt;

/// Log level threshold, ordered from most to least verbose.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum LogLevel {
    /// Diagnostic detail (candidate file lists, state-file paths).
    Debug,
    /// Normal progress reporting.
    Info,
    /// Suspicious but non-fatal conditions.
    Warn,
    /// Failures.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warning"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// A stderr logger with a level threshold.
#[derive(Clone, Debug)]
pub struct Logger {
    threshold: LogLevel,
}

impl Logger {
    /// Creates a logger that emits messages at or above `threshold`.
    pub fn new(threshold: LogLevel) -> Self {
        Self { threshold }
    }

    /// Derives the threshold from the usual CLI flags: `--verbose` wins over
    /// `--quiet`; neither means `Info`.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        let threshold = if verbose {
            LogLevel::Debug
        } else if quiet {
            LogLevel::Error
        } else {
            LogLevel::Info
        };
        Self::new(threshold)
    }

    /// Returns `true` if messages at `level` would be emitted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.threshold
    }

    /// Returns `true` if debug output is enabled.
    pub fn debug_enabled(&self) -> bool {
        self.enabled(LogLevel::Debug)
    }

    fn emit(&self, level: LogLevel, msg: &str) {
        if self.enabled(level) {
            eprintln!("{level}: {msg}");
        }
    }

    /// Logs at debug level.
    pub fn debug(&self, msg: &str) {
        self.emit(LogLevel::Debug, msg);
    }

    /// Logs at info level.
    pub fn info(&self, msg: &str) {
        self.emit(LogLevel::Info, msg);
    }

    /// Logs at warning level.
    pub fn warn(&self, msg: &str) {
        self.emit(LogLevel::Warn, msg);
    }

    /// Logs at error level.
    pub fn error(&self, msg: &str) {
        self.emit(LogLevel::Error, msg);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn default_threshold_is_info() {
        let log = Logger::default();
        assert!(!log.enabled(LogLevel::Debug));
        assert!(log.enabled(LogLevel::Info));
        assert!(log.enabled(LogLevel::Error));
    }

    #[test]
    fn from_flags_verbose() {
        let log = Logger::from_flags(false, true);
        assert!(log.debug_enabled());
    }

    #[test]
    fn from_flags_quiet() {
        let log = Logger::from_flags(true, false);
        assert!(!log.enabled(LogLevel::Info));
        assert!(log.enabled(LogLevel::Error));
    }

    #[test]
    fn verbose_wins_over_quiet() {
        let log = Logger::from_flags(true, true);
        assert!(log.debug_enabled());
    }

    #[test]
    fn display_names() {
        assert_eq!(LogLevel::Warn.to_string(), "warning");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }
}
