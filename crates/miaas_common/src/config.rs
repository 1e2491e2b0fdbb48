//! Dashboard configuration
//!
//! Resolution order, highest first:
//! 1. `--api-url` on the command line
//! 2. `API_BASE_URL` environment variable
//! 3. config file (`--config PATH`, or `~/.config/miaas/dashboard.toml`)
//! 4. built-in default (`http://localhost:8000`)
//!
//! Resolved once at startup and handed to the fetch controller; nothing
//! re-reads it afterwards.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the configured base URL
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

const CONFIG_DIR: &str = "miaas";
const CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Control-plane base URL, without the `/api/v1` suffix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout. Unset means wait until the transport gives up.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl DashboardConfig {
    /// `~/.config/miaas/dashboard.toml` (or the platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Parse a config file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit file if one was given (it must exist), otherwise the
    /// default location if present, otherwise built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!("Loading dashboard config from {}", path.display());
                Self::load_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Apply an environment value. Empty strings count as unset.
    pub fn with_env_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        self
    }

    pub fn with_cli_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value {
            self.api_base_url = url;
        }
        self
    }

    /// Full resolution: file, then environment, then command line.
    pub fn resolve(
        config_path: Option<&Path>,
        cli_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(config_path)?
            .with_env_override(std::env::var(API_BASE_URL_ENV).ok())
            .with_cli_override(cli_url);
        config.validate()?;
        Ok(config)
    }

    /// Base URL with trailing slashes removed, ready for path joining
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// The base URL must be an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason,
        };

        let url = reqwest::Url::parse(self.base_url()).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme '{}'", other))),
        }
    }
}
