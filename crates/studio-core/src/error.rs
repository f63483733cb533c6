//! Error types for studio-core.
//!
//! None of these reach a page loader: `ReleaseInfoProvider` logs them and
//! swaps in a placeholder result. They exist so the fetch path can use `?`
//! and so tests and logs can tell failures apart.

use std::fmt;
use thiserror::Error;

/// Main error type for the studio core library.
#[derive(Debug, Error)]
pub enum StudioError {
    // Transport errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Rate limited by {service}, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        service: String,
        retry_after_secs: Option<u64>,
    },

    // Response errors
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Input errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for studio operations.
pub type Result<T> = std::result::Result<T, StudioError>;

/// Coarse classification of a failed fetch, used in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Host unreachable, connection reset, timeout.
    Transport,
    /// The server answered with a non-success status.
    Status,
    /// The body was not the JSON shape we expected.
    Parse,
    /// The query or configuration was unusable.
    Invalid,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Status => "status",
            FailureKind::Parse => "parse",
            FailureKind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(err: reqwest::Error) -> Self {
        StudioError::Network {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl StudioError {
    /// Shorthand for a validation failure on a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        StudioError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Classify this error for logging.
    pub fn kind(&self) -> FailureKind {
        match self {
            StudioError::Network { .. } | StudioError::Timeout(_) => FailureKind::Transport,
            StudioError::RateLimited { .. } | StudioError::HttpStatus { .. } => {
                FailureKind::Status
            }
            StudioError::Json { .. } => FailureKind::Parse,
            StudioError::Validation { .. } | StudioError::Config { .. } => FailureKind::Invalid,
        }
    }
}
