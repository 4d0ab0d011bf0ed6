//! Error types for the session gateway

use reqwest::StatusCode;
use thiserror::Error;

/// Why a credential renewal failed.
///
/// Cloneable so a single failure can reject every call queued behind it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenewalError {
    #[error("No refresh token stored")]
    MissingRefreshToken,

    #[error("Session expired, sign in again")]
    SessionExpired,

    #[error("Renewal rejected with status {0}")]
    Rejected(StatusCode),

    #[error("Malformed renewal response: {0}")]
    MalformedResponse(String),

    #[error("Renewal request failed: {0}")]
    Transport(String),

    #[error("Renewal timed out")]
    TimedOut,

    #[error("Renewal was abandoned before it settled")]
    Abandoned,

    #[error("Credential storage error: {0}")]
    Storage(String),
}

/// Session gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token renewal failed: {0}")]
    Renewal(#[from] RenewalError),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Http(e)
        }
    }
}

impl GatewayError {
    /// True when the failure means the user has to sign in again.
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, GatewayError::Unauthorized | GatewayError::Renewal(_))
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
