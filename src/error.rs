// Error types for folio.
// Covers invalid proxy input, upstream HTTP failures, cache tier faults, and configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache tier error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl FolioError {
    /// Whether this error is the caller's fault (maps to HTTP 400).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, FolioError::InvalidInput(_))
    }
}

impl From<redis::RedisError> for FolioError {
    fn from(err: redis::RedisError) -> Self {
        FolioError::Cache(err.to_string())
    }
}

impl From<crate::config::ConfigError> for FolioError {
    fn from(err: crate::config::ConfigError) -> Self {
        FolioError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
