//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::fetch::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TITLE_ID};
use crate::models::Region;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Match API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Shards root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `X-TITLE-ID` header value
    #[serde(default = "default_title_id")]
    pub title_id: String,

    /// Text file whose first line is the API key
    #[serde(default = "default_key_file")]
    pub key_file: PathBuf,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Region queried by the dashboard at start-up
    #[serde(default)]
    pub region: Region,

    /// Matches fetched by the dashboard at start-up
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Look-back window of the dashboard fetch, in days
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_title_id() -> String {
    DEFAULT_TITLE_ID.to_string()
}

fn default_key_file() -> PathBuf {
    PathBuf::from("key.txt")
}

fn default_timeout() -> u64 {
    30
}

fn default_page_limit() -> u32 {
    5
}

fn default_days() -> i64 {
    28
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            title_id: default_title_id(),
            key_file: default_key_file(),
            timeout_seconds: default_timeout(),
            region: Region::default(),
            page_limit: default_page_limit(),
            days: default_days(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            title_id: self.title_id.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Also write logs to this file
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            log_file: None,
            api: ApiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if self.api.page_limit == 0 {
            return Err(ConfigError::ValidationError(
                "API page limit must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
