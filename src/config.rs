//! Configuration management for daylog

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::{RotationPolicy, DEFAULT_MAX_SIZE, DEFAULT_RETENTION_DAYS};

/// Upper bound on `max_age_days`, well inside what `chrono::Duration` can hold
const MAX_AGE_DAYS_CAP: u64 = 1_000_000;

/// Application identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Short name, used to derive the log directory
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Name recorded in the session header
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

/// Server metadata recorded in the session header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Log directory and rotation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Override for the log directory (default: `<temp dir>/<app name>`)
    /// Supports `~` expansion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Files older than this are deleted at startup (default: 30)
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,

    /// Size in MiB before the day's file is rolled, 0 means default (default: 2)
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,

    /// Rolled backups kept per day, 0 keeps all (default: 30)
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,

    /// Age in days after which rolled backups are deleted, 0 keeps all (default: 30)
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,

    /// Use local time in backup file names (default: true)
    #[serde(default = "default_local_time")]
    pub local_time: bool,
}

fn default_app_name() -> String {
    "daylog".to_string()
}

fn default_display_name() -> String {
    "daylog".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_retention_days() -> u64 {
    DEFAULT_RETENTION_DAYS
}

fn default_max_size_mb() -> u64 {
    2
}

fn default_max_backups() -> usize {
    30
}

fn default_max_age_days() -> u64 {
    30
}

fn default_local_time() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            display_name: default_display_name(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            retention_days: default_retention_days(),
            max_size_mb: default_max_size_mb(),
            max_backups: default_max_backups(),
            max_age_days: default_max_age_days(),
            local_time: default_local_time(),
        }
    }
}

impl LoggingConfig {
    /// Size-based rotation thresholds described by this config
    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy {
            max_size: match self.max_size_mb {
                0 => DEFAULT_MAX_SIZE,
                mb => mb.saturating_mul(1024 * 1024),
            },
            max_backups: self.max_backups,
            max_age: Duration::days(self.max_age_days.min(MAX_AGE_DAYS_CAP) as i64),
            local_time: self.local_time,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `path`, or return default if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Directory holding the log files
    pub fn log_dir(&self) -> PathBuf {
        match &self.logging.directory {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).into_owned()),
            None => std::env::temp_dir().join(&self.app.name),
        }
    }
}

/// Get the base configuration directory (~/.daylog)
/// Falls back to ./.daylog if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".daylog")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".daylog"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
