pub mod commute;
pub mod config;
pub mod doctor;
pub mod search;

use aptscout_core::config::{AppConfig, ConfigError, LoadOptions, LoggingConfig};
use aptscout_core::init_logging;
use serde::Serialize;

pub const EXIT_CONFIG: u8 = 2;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    /// Raw output that is not wrapped in a [`CommandOutcome`].
    pub fn raw(exit_code: u8, output: impl Into<String>) -> Self {
        Self { exit_code, output: output.into() }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn config_failure(command: &str, error: &ConfigError) -> Self {
        Self::failure(command, "config_validation", error.to_string(), EXIT_CONFIG)
    }
}

/// Loads configuration and installs stderr logging at the configured level.
pub(crate) fn load_config() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load(LoadOptions::default())?;
    install_logging(&config.logging);
    Ok(config)
}

/// Returns whether this call installed the subscriber. An error only means the
/// first command run in this process already installed one.
fn install_logging(logging: &LoggingConfig) -> bool {
    init_logging(logging).is_ok()
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
