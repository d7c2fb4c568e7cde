use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for backend API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the analytics backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, DNS or URL failure before a response body was read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not JSON
    #[error("invalid JSON in {status} response: {source}")]
    InvalidJson {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    /// Response was JSON but did not match the endpoint schema
    #[error("unexpected response shape from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Backend answered with a non-success status
    #[error("backend returned {status}: {detail}")]
    Backend { status: StatusCode, detail: String },

    /// Local file could not be read for upload
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// HTTP status attached to the error, if a response was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::InvalidJson { status, .. } | ApiError::Backend { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status(),
            ApiError::Decode { .. } | ApiError::Io { .. } => None,
        }
    }
}
