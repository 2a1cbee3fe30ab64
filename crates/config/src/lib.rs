#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for sigdown
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/sigdown/config.toml)
//! - Environment variables
//!
//! The downloader itself never reads files or the environment; callers load a
//! [`Config`] here and hand the relevant sections over.

pub mod constants;

use serde::{Deserialize, Serialize};
use sigdown_errors::{ConfigError, Error};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_BYTES, DEFAULT_POOL_IDLE_TIMEOUT_SECS,
    DEFAULT_POOL_MAX_IDLE_PER_HOST, DEFAULT_TIMEOUT_SECS,
};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// Byte and time budgets applied to every download
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64, // seconds
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout_secs: u64,
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DownloadConfig {
    /// Byte cap per stream; zero falls back to the default
    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        if self.max_bytes == 0 {
            DEFAULT_MAX_BYTES
        } else {
            self.max_bytes
        }
    }

    /// Deadline for a whole download; zero falls back to the default
    #[must_use]
    pub fn timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            pool_idle_timeout_secs: DEFAULT_POOL_IDLE_TIMEOUT_SECS,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions for serde
fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_pool_idle_timeout() -> u64 {
    DEFAULT_POOL_IDLE_TIMEOUT_SECS
}

fn default_pool_max_idle_per_host() -> usize {
    DEFAULT_POOL_MAX_IDLE_PER_HOST
}

fn default_user_agent() -> String {
    format!("sigdown/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("sigdown").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or has fields of the wrong type.
    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // SIGDOWN_MAX_BYTES
        if let Ok(max_bytes) = std::env::var("SIGDOWN_MAX_BYTES") {
            self.download.max_bytes = max_bytes.parse().map_err(|_| ConfigError::InvalidValue {
                field: "SIGDOWN_MAX_BYTES".to_string(),
                value: max_bytes,
            })?;
        }

        // SIGDOWN_TIMEOUT_SECS
        if let Ok(timeout) = std::env::var("SIGDOWN_TIMEOUT_SECS") {
            self.download.timeout_secs = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "SIGDOWN_TIMEOUT_SECS".to_string(),
                value: timeout,
            })?;
        }

        // SIGDOWN_USER_AGENT
        if let Ok(agent) = std::env::var("SIGDOWN_USER_AGENT") {
            if agent.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "SIGDOWN_USER_AGENT".to_string(),
                    value: agent,
                }
                .into());
            }
            self.network.user_agent = agent;
        }

        Ok(())
    }
}
