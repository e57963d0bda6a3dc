//! Error types and handling
//!
//! Every failure the client or a reconciler can produce is a [`ProviderError`].
//! Reconcilers never return these directly to the orchestrator; they are folded
//! into [`Diagnostic`](crate::models::Diagnostic) values instead.

use thiserror::Error;

/// Provider error types
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, DNS, TLS or timeout failure talking to the CA
    #[error("transport error: {0}")]
    Transport(String),

    /// The CA answered with a status that is not tolerated for this call
    #[error("unexpected status: {status}{}", remote_body_suffix(.body))]
    Remote { status: u16, body: String },

    /// A success response carried a body that could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// A local precondition failed before any remote call was issued
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// The reconciler was built without a client
    #[error("missing client")]
    NotConfigured,

    /// Invalid provider configuration
    #[error("configuration error: {0}")]
    Config(String),
}

fn remote_body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({})", body)
    }
}

impl ProviderError {
    /// Build a `Remote` error from a status code and response body
    pub fn remote(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        ProviderError::Remote {
            status: status.as_u16(),
            body: body.into(),
        }
    }

    /// HTTP status carried by a `Remote` error
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else if err.is_timeout() {
            ProviderError::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ProviderError::Transport(format!("failed to connect: {}", err))
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Decode(format!("JSON parsing error: {}", err))
    }
}

/// Result type alias for client and reconciler internals
pub type ProviderResult<T> = Result<T, ProviderError>;
