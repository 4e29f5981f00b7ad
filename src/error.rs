//! Error types for the Cybrty CLI

use std::time::Duration;
use thiserror::Error;

/// Result type alias for Cybrty operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Outcome of a single failed HTTP attempt.
///
/// Exactly one variant describes any failed attempt: the server answered
/// with a non-2xx status, no response was obtained, or the deadline passed.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        code: Option<String>,
        details: Option<serde_json::Value>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// HTTP status code, when the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable error code from the response body
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Client errors (4xx) are final; everything else may succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::Network(_) | ApiError::Timeout(_) => true,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Scan lifecycle errors
#[derive(Debug, Clone, Error)]
pub enum ScanError {
    /// The scanning backend reported the scan as failed
    #[error("{0}")]
    Failed(String),

    #[error("Scan polling timeout - scan did not complete within {attempts} status checks")]
    PollTimeout { attempts: u32 },

    #[error("A scan is already in progress")]
    AlreadyInProgress,

    #[error("Scan launch response did not include a scan ID")]
    MissingScanId,

    #[error("Scan was cancelled")]
    Cancelled,

    #[error("No scan is running")]
    NotRunning,
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `cybrty init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Base URL for {0} is not configured")]
    MissingBaseUrl(&'static str),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
