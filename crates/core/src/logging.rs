//! Process-wide `tracing` subscriber shared by every binary. Always writes to
//! stderr: the MCP server's stdout carries the protocol and the CLI's carries
//! command output.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

const FALLBACK_LEVEL: &str = "info";

#[derive(Debug, Error)]
#[error("failed to initialize logging: {0}")]
pub struct LoggingInitError(String);

/// Installs the subscriber described by `logging`. Errors when one is already installed.
pub fn init_logging(logging: &LoggingConfig) -> Result<(), LoggingInitError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&logging.level))
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr);

    let result = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|error| LoggingInitError(error.to_string()))
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}
