//! Bridge configuration.
//!
//! Values come from built-in defaults, then an optional TOML file passed with
//! `--config <path>`, then `FUEL_BRIDGE_*` environment variables.

use fuelbridge_core::LogFormat;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const ENV_HOST: &str = "FUEL_BRIDGE_HOST";
pub const ENV_PORT: &str = "FUEL_BRIDGE_PORT";
pub const ENV_REDIS_URL: &str = "FUEL_BRIDGE_REDIS_URL";
pub const ENV_TOPIC: &str = "FUEL_BRIDGE_TOPIC";
pub const ENV_LOG_FORMAT: &str = "FUEL_BRIDGE_LOG_FORMAT";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Invalid command line: {0}")]
    Usage(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Reconnect backoff for the pub/sub transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_bind_host")]
    pub bind_host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}

fn default_topic() -> String {
    "fuel_info".to_string()
}

fn default_initial_delay() -> u64 {
    500
}

fn default_max_delay() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl RetryConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            port: default_port(),
            redis_url: default_redis_url(),
            topic: default_topic(),
            log_format: LogFormat::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Defaults, overlaid by the optional file, overlaid by the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `FUEL_BRIDGE_*` overrides using `lookup` to resolve variables
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.bind_host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = parse_env(ENV_PORT, port)?;
        }
        if let Some(url) = lookup(ENV_REDIS_URL) {
            self.redis_url = url;
        }
        if let Some(topic) = lookup(ENV_TOPIC) {
            self.topic = topic;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.log_format = parse_env(ENV_LOG_FORMAT, format)?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topic.trim().is_empty() {
            return Err(ConfigError::Validation("topic must not be empty".into()));
        }
        if self.retry.max_delay_ms < self.retry.initial_delay_ms {
            return Err(ConfigError::Validation(format!(
                "retry.max_delay_ms ({}) is below retry.initial_delay_ms ({})",
                self.retry.max_delay_ms, self.retry.initial_delay_ms
            )));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

fn parse_env<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

/// Parsed command line
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub version_json: bool,
}

impl CliArgs {
    /// Parse `args` as returned by `std::env::args()`, program name included
    pub fn parse(args: &[String]) -> Result<Self, ConfigError> {
        let mut cli = CliArgs::default();
        let mut args_iter = args.iter().skip(1);
        while let Some(arg) = args_iter.next() {
            match arg.as_str() {
                "--version-json" => cli.version_json = true,
                "--config" => match args_iter.next() {
                    Some(path) => cli.config_path = Some(PathBuf::from(path)),
                    None => {
                        return Err(ConfigError::Usage(
                            "--config was provided without a path".into(),
                        ))
                    }
                },
                other => return Err(ConfigError::Usage(format!("unknown argument '{}'", other))),
            }
        }
        Ok(cli)
    }
}
