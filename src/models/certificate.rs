//! Certificate signing payloads for the CA `/sign` endpoint

use serde::{Deserialize, Serialize};

/// Request body for `POST /sign`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignRequest {
    /// PEM-encoded certificate signing request
    pub csr: String,
    /// One-time token authorising the signature
    pub ott: String,
}

/// Response body from `POST /sign`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignResponse {
    /// PEM-encoded leaf certificate
    pub crt: String,
}
