//! Error types for the remote gateway.

use thiserror::Error;

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors that can occur talking to the remote backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No usable backend credentials.
    #[error("remote backend not configured: {0}")]
    NotConfigured(String),

    /// Transport failure (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Credentials rejected.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The backend refused the payload.
    #[error("validation rejected: {0}")]
    Validation(String),

    /// The addressed record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be mapped to an entity.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<campusdesk_types::Error> for RemoteError {
    fn from(e: campusdesk_types::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
