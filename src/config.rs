//! Configuration module for Filebay.

use serde::Deserialize;
use std::path::Path;

use crate::{FilebayError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the storage root directory.
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Maximum upload size in megabytes (per request).
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    /// Maximum file size in bytes eligible for inline text editing.
    #[serde(default = "default_max_edit_bytes")]
    pub max_edit_bytes: u64,
    /// File extensions (lowercase, without the dot) eligible for inline
    /// text editing.
    #[serde(default = "default_editable_extensions")]
    pub editable_extensions: Vec<String>,
}

fn default_storage_root() -> String {
    "storage".to_string()
}

fn default_max_upload_mb() -> u64 {
    100
}

fn default_max_edit_bytes() -> u64 {
    1_000_000
}

fn default_editable_extensions() -> Vec<String> {
    [
        "txt", "md", "markdown", "json", "csv", "py", "rs", "toml", "yaml", "yml", "html", "css",
        "js", "xml", "log",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl StorageConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            max_upload_mb: default_max_upload_mb(),
            max_edit_bytes: default_max_edit_bytes(),
            editable_extensions: default_editable_extensions(),
        }
    }
}

/// API access configuration.
///
/// When `key` is empty the API runs in OPEN MODE: every request is allowed
/// without any credential check. This is a deliberate default intended for
/// trusted networks only, not an omission. Set a key (or the `FILEBAY_API_KEY`
/// environment variable) to require `X-API-Key` on mutating endpoints.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiConfig {
    /// Shared secret gating the mutating API endpoints. Empty = open mode.
    #[serde(default)]
    pub key: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/filebay.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// API access configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FilebayError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable
    /// overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FilebayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEBAY_API_KEY`: Override the API shared secret
    pub fn apply_env_overrides(&mut self) {
        self.apply_api_key_override(std::env::var("FILEBAY_API_KEY").ok());
    }

    /// Apply an API key override taken from the environment. An unset or
    /// empty value leaves the configured key in place.
    fn apply_api_key_override(&mut self, key: Option<String>) {
        if let Some(key) = key {
            if !key.is_empty() {
                self.api.key = key;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_upload_mb == 0 {
            return Err(FilebayError::Config(
                "storage.max_upload_mb must be greater than zero".to_string(),
            ));
        }
        if self.storage.root.trim().is_empty() {
            return Err(FilebayError::Config(
                "storage.root must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
