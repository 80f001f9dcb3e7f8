//! Client error types.

use thiserror::Error;

/// Errors returned by [`BridgeClient`](crate::BridgeClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The bridge answered with a non-2xx status.
    ///
    /// `message` is the envelope's `error` field when the body is an error
    /// envelope, otherwise the raw body.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure or undecodable body.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid bridge URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
