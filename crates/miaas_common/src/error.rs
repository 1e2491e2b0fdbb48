//! Error types for the control-plane client and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Why a fetch cycle failed.
///
/// The dashboard never shows these structurally: every variant is turned
/// into its display string at the fetch-cycle boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (DNS, refused connection, reset).
    #[error("{0}")]
    Transport(String),

    /// The control-plane answered with a non-2xx status.
    #[error("HTTP error: status {0}")]
    Status(u16),

    /// The body was not a JSON array of node records.
    #[error("Invalid response body: {0}")]
    Parse(String),

    /// Single-node lookup returned 404.
    #[error("Node not found: {0}")]
    NotFound(String),

    #[error("Invalid control-plane URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Numeric status for protocol failures
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(code) => Some(*code),
            FetchError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
