use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DATASET_PATH: &str = "data/apartments_cleaned.csv";
pub const DEFAULT_MAPS_SERVER_SCRIPT: &str =
    "node_modules/@modelcontextprotocol/server-google-maps/dist/index.js";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub maps: MapsConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

/// How to launch the maps MCP server and what to ask it for.
#[derive(Clone, Debug)]
pub struct MapsConfig {
    pub command: String,
    pub args: Vec<String>,
    pub api_key: Option<SecretString>,
    /// Name of the environment variable the child process reads the key from.
    pub api_key_env: String,
    pub tool_name: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub dataset_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub maps_command: Option<String>,
    pub maps_args: Option<Vec<String>>,
    pub maps_api_key: Option<String>,
    pub maps_timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig { path: PathBuf::from(DEFAULT_DATASET_PATH) },
            maps: MapsConfig {
                command: "node".to_string(),
                args: vec![DEFAULT_MAPS_SERVER_SCRIPT.to_string()],
                api_key: None,
                api_key_env: "GOOGLE_MAPS_API_KEY".to_string(),
                tool_name: "maps_distance_matrix".to_string(),
                timeout_secs: 30,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("aptscout.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// True when no maps API key is configured. Commute lookups will fail until one is set.
    pub fn maps_credential_missing(&self) -> bool {
        self.maps.api_key.as_ref().map(|key| key.expose_secret().trim().is_empty()).unwrap_or(true)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(dataset) = patch.dataset {
            if let Some(path) = dataset.path {
                self.dataset.path = path;
            }
        }

        if let Some(maps) = patch.maps {
            if let Some(command) = maps.command {
                self.maps.command = command;
            }
            if let Some(args) = maps.args {
                self.maps.args = args;
            }
            if let Some(maps_api_key_value) = maps.api_key {
                self.maps.api_key = Some(secret_value(maps_api_key_value));
            }
            if let Some(api_key_env) = maps.api_key_env {
                self.maps.api_key_env = api_key_env;
            }
            if let Some(tool_name) = maps.tool_name {
                self.maps.tool_name = tool_name;
            }
            if let Some(timeout_secs) = maps.timeout_secs {
                self.maps.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("APTSCOUT_DATASET_PATH") {
            self.dataset.path = PathBuf::from(value);
        }

        if let Some(value) = read_env("APTSCOUT_MAPS_COMMAND") {
            self.maps.command = value;
        }
        if let Some(value) = read_env("APTSCOUT_MAPS_ARGS") {
            self.maps.args = value.split_whitespace().map(str::to_string).collect();
        }
        let api_key =
            read_env("APTSCOUT_MAPS_API_KEY").or_else(|| read_env("GOOGLE_MAPS_API_KEY"));
        if let Some(value) = api_key {
            self.maps.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("APTSCOUT_MAPS_API_KEY_ENV") {
            self.maps.api_key_env = value;
        }
        if let Some(value) = read_env("APTSCOUT_MAPS_TOOL_NAME") {
            self.maps.tool_name = value;
        }
        if let Some(value) = read_env("APTSCOUT_MAPS_TIMEOUT_SECS") {
            self.maps.timeout_secs = parse_u64("APTSCOUT_MAPS_TIMEOUT_SECS", &value)?;
        }

        let log_level =
            read_env("APTSCOUT_LOGGING_LEVEL").or_else(|| read_env("APTSCOUT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("APTSCOUT_LOGGING_FORMAT").or_else(|| read_env("APTSCOUT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(dataset_path) = overrides.dataset_path {
            self.dataset.path = dataset_path;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(maps_command) = overrides.maps_command {
            self.maps.command = maps_command;
        }
        if let Some(maps_args) = overrides.maps_args {
            self.maps.args = maps_args;
        }
        if let Some(maps_api_key) = overrides.maps_api_key {
            self.maps.api_key = Some(secret_value(maps_api_key));
        }
        if let Some(maps_timeout_secs) = overrides.maps_timeout_secs {
            self.maps.timeout_secs = maps_timeout_secs;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dataset(&self.dataset)?;
        validate_maps(&self.maps)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("aptscout.toml"), PathBuf::from("config/aptscout.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_dataset(dataset: &DatasetConfig) -> Result<(), ConfigError> {
    if dataset.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("dataset.path must not be empty".to_string()));
    }

    Ok(())
}

fn validate_maps(maps: &MapsConfig) -> Result<(), ConfigError> {
    if maps.command.trim().is_empty() {
        return Err(ConfigError::Validation(
            "maps.command is required (e.g. `node` or a path to the maps MCP server)".to_string(),
        ));
    }

    let env_name = maps.api_key_env.trim();
    if env_name.is_empty() || env_name.contains('=') || env_name.contains(char::is_whitespace) {
        return Err(ConfigError::Validation(
            "maps.api_key_env must be a valid environment variable name".to_string(),
        ));
    }

    if maps.tool_name.trim().is_empty() {
        return Err(ConfigError::Validation("maps.tool_name must not be empty".to_string()));
    }

    if maps.timeout_secs == 0 || maps.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "maps.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    dataset: Option<DatasetPatch>,
    maps: Option<MapsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatasetPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct MapsPatch {
    command: Option<String>,
    args: Option<Vec<String>>,
    api_key: Option<String>,
    api_key_env: Option<String>,
    tool_name: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
