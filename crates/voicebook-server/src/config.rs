//! Front-end configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;
use voicebook_client::ServiceConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Remote booking service settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Local HTTP front-end settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the local front end.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted recording upload, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "voicebook_session=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// No booking service URL in the file or the environment.
    #[error("service.api_url is not set (use VOICEBOOK_API_URL)")]
    MissingApiUrl,
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `VOICEBOOK_API_URL` overrides `service.api_url`
/// - `VOICEBOOK_REQUEST_TIMEOUT_SECS` overrides `service.request_timeout_secs`
/// - `VOICEBOOK_HOST` overrides `server.host`
/// - `VOICEBOOK_PORT` overrides `server.port`
/// - `VOICEBOOK_MAX_UPLOAD_BYTES` overrides `server.max_upload_bytes`
/// - `VOICEBOOK_LOG_LEVEL` overrides `logging.level`
/// - `VOICEBOOK_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed,
/// or if no service URL is configured anywhere.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with an injectable environment lookup.
pub fn load_config_with(
    path: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    if let Some(url) = env("VOICEBOOK_API_URL") {
        config.service.api_url = url;
    }
    if let Some(timeout) = env("VOICEBOOK_REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = timeout.parse() {
            config.service.request_timeout_secs = parsed;
        }
    }
    if let Some(host) = env("VOICEBOOK_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = env("VOICEBOOK_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(max) = env("VOICEBOOK_MAX_UPLOAD_BYTES") {
        if let Ok(parsed) = max.parse() {
            config.server.max_upload_bytes = parsed;
        }
    }
    if let Some(level) = env("VOICEBOOK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = env("VOICEBOOK_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    if !config.service.is_configured() {
        return Err(ConfigError::MissingApiUrl);
    }

    Ok(config)
}
