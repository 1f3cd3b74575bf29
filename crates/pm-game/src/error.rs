//! Error types for the coordinator

use std::path::PathBuf;

use thiserror::Error;

/// Launch configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Asset loading errors. Only ever marks an item unavailable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset {url} failed to load: {reason}")]
    LoadFailed { url: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
