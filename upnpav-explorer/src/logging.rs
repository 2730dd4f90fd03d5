//! Logging setup for the explorer
//!
//! Listings go to stdout; diagnostics go to stderr through a
//! `tracing-subscriber` fmt layer so they never mix with the output.
//!
//! Environment:
//! - `UPNPAV_LOG_MODE`: `silent`, `development` or `debug`; replaces the
//!   mode picked from `-v`. Other values are ignored.
//! - `UPNPAV_LOG_LEVEL`, then `RUST_LOG`: filter directives replacing the
//!   mode's default level.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// How much the explorer logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber installed
    Silent,
    /// Compact lines, info and above
    Development,
    /// Verbose with source locations
    Debug,
}

impl LoggingMode {
    /// Mode for a `-v` count, unless `UPNPAV_LOG_MODE` says otherwise
    pub fn from_verbosity(verbose: u8) -> Self {
        match std::env::var("UPNPAV_LOG_MODE").as_deref() {
            Ok("silent") => return LoggingMode::Silent,
            Ok("development") => return LoggingMode::Development,
            Ok("debug") => return LoggingMode::Debug,
            _ => {}
        }
        match verbose {
            0 => LoggingMode::Silent,
            1 => LoggingMode::Development,
            _ => LoggingMode::Debug,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Install the global subscriber for `mode`
///
/// The level defaults per mode and can be overridden with
/// `UPNPAV_LOG_LEVEL`, then `RUST_LOG`.
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => Registry::default()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .with(env_filter("info"))
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string())),
        LoggingMode::Debug => Registry::default()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .pretty()
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(env_filter("debug"))
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string())),
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    match std::env::var("UPNPAV_LOG_LEVEL").or_else(|_| std::env::var("RUST_LOG")) {
        Ok(level) => EnvFilter::new(level),
        Err(_) => EnvFilter::new(default_level),
    }
}
