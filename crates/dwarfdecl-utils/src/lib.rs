//! # dwarfdecl Utilities
//!
//! Shared helpers for the dwarfdecl workspace, chiefly the `tracing` based
//! logging setup used by the command-line tool.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with, init_logging_with_level, LogFormat, LogLevel, LoggingError};
pub use tracing::{debug, error, info, trace, warn};
