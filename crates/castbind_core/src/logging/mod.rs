//! Logging infrastructure for castbind.
//!
//! This module provides:
//! - Per-run loggers with file + console dual output
//! - Compact mode with progress filtering
//! - Tail buffer of tool output for failure reports
//! - Global `tracing` subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use castbind_core::logging::{LogConfig, RunLogger};
//!
//! let logger = RunLogger::new("audiobook", ".logs", LogConfig::default(), None).unwrap();
//!
//! logger.phase("Convert");
//! logger.command("ffmpeg -i 1.mp3 temp/temp_1.mp3.m4a");
//! logger.progress(50);
//! logger.success("Audiobook created");
//! ```

mod run_logger;
mod types;

pub use run_logger::{RunLogger, RunLoggerBuilder};
pub use types::{ConsoleCallback, LogConfig, LogLevel, MessagePrefix};

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix of the rolling application log.
pub const APP_LOG_PREFIX: &str = "castbind.log";

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()))
}

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter(default_level))
        .init();
}

/// Like [`init_tracing`], also writing a daily-rolling log under `log_dir`.
///
/// The returned guard must be held until exit so buffered lines are flushed.
pub fn init_tracing_with_file(default_level: LogLevel, log_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(log_dir, APP_LOG_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter(default_level))
        .init();

    guard
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_to_filter_works() {
        assert_eq!(LogLevel::Debug.as_filter_str(), "debug");
        assert_eq!(LogLevel::Info.as_filter_str(), "info");
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
    }
}
