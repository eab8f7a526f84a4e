use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use aptscout_core::config::AppConfig;
use secrecy::ExposeSecret;
use toml::Value;

use crate::commands::{load_config, CommandResult};

struct ConfigFile {
    path: Option<PathBuf>,
    doc: Option<Value>,
}

impl ConfigFile {
    fn detect() -> Self {
        let path = ["aptscout.toml", "config/aptscout.toml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists());
        let doc = load_config_file_doc(path.as_deref());
        Self { path, doc }
    }

    fn source(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env_is_set(key)) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

pub fn run() -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure("config", &error),
    };

    CommandResult::raw(0, render(&config, &ConfigFile::detect()))
}

fn render(config: &AppConfig, file: &ConfigFile) -> String {
    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    let mut push = |key: &str, value: &str, env_keys: &[&str]| {
        lines.push(render_line(key, value, file.source(key, env_keys)));
    };

    push("dataset.path", &config.dataset.path.display().to_string(), &["APTSCOUT_DATASET_PATH"]);

    push("maps.command", &config.maps.command, &["APTSCOUT_MAPS_COMMAND"]);
    push("maps.args", &config.maps.args.join(" "), &["APTSCOUT_MAPS_ARGS"]);
    let api_key = match &config.maps.api_key {
        Some(key) => redact_key(key.expose_secret()),
        None => "<unset>".to_string(),
    };
    push("maps.api_key", &api_key, &["APTSCOUT_MAPS_API_KEY", "GOOGLE_MAPS_API_KEY"]);
    push("maps.api_key_env", &config.maps.api_key_env, &["APTSCOUT_MAPS_API_KEY_ENV"]);
    push("maps.tool_name", &config.maps.tool_name, &["APTSCOUT_MAPS_TOOL_NAME"]);
    push(
        "maps.timeout_secs",
        &config.maps.timeout_secs.to_string(),
        &["APTSCOUT_MAPS_TIMEOUT_SECS"],
    );

    push("logging.level", &config.logging.level, &["APTSCOUT_LOGGING_LEVEL", "APTSCOUT_LOG_LEVEL"]);
    push(
        "logging.format",
        &format!("{:?}", config.logging.format),
        &["APTSCOUT_LOGGING_FORMAT", "APTSCOUT_LOG_FORMAT"],
    );

    lines.join("\n")
}

fn env_is_set(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps the first four characters of keys long enough that doing so reveals little.
fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    match trimmed.get(..4) {
        Some(prefix) if trimmed.len() >= 16 => format!("{prefix}***"),
        _ => "<redacted>".to_string(),
    }
}
