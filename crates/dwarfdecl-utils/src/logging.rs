//! # Logging Utilities
//!
//! Logging infrastructure for dwarfdecl using `tracing`.
//!
//! Declarations are written to stdout, so every console layer configured here
//! writes to stderr. Supported:
//! - Multiple output formats (JSON for machines, pretty for people)
//! - Environment variable configuration
//! - Log level filtering
//! - Optional daily-rolling log file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dwarfdecl_utils::init_logging;
//!
//! // Initialize with default settings (reads from RUST_LOG env var)
//! init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=dwarfdecl_core=trace`)
//! - `DWARFDECL_LOG_FORMAT`: Set output format (`json` or `pretty`, default: `pretty`)
//! - `DWARFDECL_LOG_FILE`: Optional path to log file (if not set, logs only to stderr)
//!
//! ## Examples
//!
//! ```rust,no_run
//! use dwarfdecl_utils::{LogFormat, LogLevel, init_logging_with_level};
//!
//! init_logging_with_level(LogLevel::Debug, LogFormat::Json).expect("Failed to initialize logging");
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use tracing::Level;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "DWARFDECL_LOG_FORMAT";

/// Environment variable naming an additional log file.
pub const LOG_FILE_ENV: &str = "DWARFDECL_LOG_FILE";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    Pretty,
    /// JSON format, one object per line
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(format!("{s}. Use 'pretty' or 'json'"))),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose, one event per DIE)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(format!(
                "{s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            ))),
        }
    }
}

/// Initialize logging with default settings
///
/// Reads configuration from environment variables:
/// - `RUST_LOG`: Log level filter (e.g., `debug`, `dwarfdecl_core=debug`)
/// - `DWARFDECL_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
/// - `DWARFDECL_LOG_FILE`: Optional path to log file
///
/// ## Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - `DWARFDECL_LOG_FORMAT` holds an unknown format
pub fn init_logging() -> Result<(), LoggingError>
{
    init_logging_with(None, None)
}

/// Initialize logging with explicit level and format
///
/// An explicit level replaces `RUST_LOG` entirely.
///
/// ## Errors
///
/// Returns an error if logging is already initialized.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_logging_with(Some(level), Some(format))
}

/// Initialize logging, falling back to the environment for unset values
///
/// ## Errors
///
/// Returns an error if logging is already initialized or the environment
/// holds an invalid format.
pub fn init_logging_with(level: Option<LogLevel>, format: Option<LogFormat>) -> Result<(), LoggingError>
{
    let format = match format {
        Some(format) => format,
        None => env::var(LOG_FORMAT_ENV)
            .ok()
            .map(|s| LogFormat::from_str(&s))
            .transpose()?
            .unwrap_or(LogFormat::Pretty),
    };

    // Priority:
    // 1. An explicit level (from the --log-level CLI flag)
    // 2. RUST_LOG, which allows module-specific filters like "dwarfdecl_core=trace"
    // 3. INFO
    let env_filter = match level {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
    };

    let log_file = env::var(LOG_FILE_ENV).ok().map(PathBuf::from);
    init_logging_internal(format, env_filter, log_file.as_deref())
}

/// Internal initialization function
fn init_logging_internal(format: LogFormat, env_filter: EnvFilter, log_file: Option<&Path>) -> Result<(), LoggingError>
{
    // Boxed so both formats and the optional file layer share one registry type.
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    match format {
        LogFormat::Pretty => {
            layers.push(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(true)
                    .with_writer(io::stderr)
                    .boxed(),
            );
        }
        LogFormat::Json => {
            layers.push(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(io::stderr)
                    .boxed(),
            );
        }
    }

    if let Some(file_path) = log_file {
        let file_appender = tracing_appender::rolling::daily(
            file_path.parent().unwrap_or_else(|| Path::new(".")),
            file_path.file_name().unwrap_or_default(),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // The run lasts as long as the process; keep the writer thread alive.
        std::mem::forget(guard);

        let file_layer = match format {
            LogFormat::Pretty => fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false) // No ANSI in files
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_current_span(true)
                .with_span_list(true)
                .boxed(),
        };
        layers.push(file_layer);
    }

    Registry::default()
        .with(layers.with_filter(env_filter))
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("PROD").unwrap(), LogFormat::Json);
        assert!(matches!(
            LogFormat::from_str("invalid"),
            Err(LoggingError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(matches!(LogLevel::from_str("invalid"), Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_second_initialization_fails()
    {
        // Whichever call comes first in this process wins; the next must fail.
        let _ = init_logging_with_level(LogLevel::Error, LogFormat::Pretty);
        let second = init_logging_with_level(LogLevel::Error, LogFormat::Json);
        assert!(matches!(second, Err(LoggingError::InitializationFailed(_))));
    }
}
