//! step-ca API client
//!
//! Thin typed wrapper over the CA's signing and admin REST endpoints. The
//! client holds no per-call state: every method issues its request(s) and
//! returns. 404 is translated into an "absent" signal only where the
//! resource semantics call for it (lookups and deletes).

mod admin;
mod provisioner;
mod template;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::models::{SignRequest, SignResponse};
use crate::utils::error::{ProviderError, ProviderResult};

/// step-ca client for signing and administration
#[derive(Clone)]
pub struct StepCaClient {
    client: Client,
    base_url: String,
    /// One-time token for `/sign`
    token: String,
    /// Bearer token for `/admin/*`
    admin_token: Option<String>,
    admin_name: String,
    admin_provisioner: Option<String>,
}

impl StepCaClient {
    /// Create a new client from provider configuration
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        let mut client_builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        if let Some(ca_path) = &config.ssl_ca {
            let ca_pem = std::fs::read(ca_path)
                .map_err(|e| ProviderError::Config(format!("Failed to read CA bundle: {}", e)))?;
            let ca_cert = reqwest::Certificate::from_pem(&ca_pem).map_err(|e| {
                ProviderError::Config(format!("Failed to parse CA certificate: {}", e))
            })?;
            client_builder = client_builder.add_root_certificate(ca_cert);
        }

        if !config.ssl_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            ca_url = %config.ca_url,
            admin = %config.admin_name,
            admin_token = config.admin_token.is_some(),
            "step-ca client configured"
        );

        Ok(Self {
            client,
            base_url: config.ca_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            admin_token: config.admin_token.clone(),
            admin_name: config.admin_name.clone(),
            admin_provisioner: config.admin_provisioner.clone(),
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configured admin identity as `(name, provisioner)`
    pub fn admin_identity(&self) -> (&str, Option<&str>) {
        (&self.admin_name, self.admin_provisioner.as_deref())
    }

    /// Sign a CSR and return the issued certificate PEM
    pub async fn sign(&self, csr: &str) -> ProviderResult<String> {
        let body = SignRequest {
            csr: csr.to_string(),
            ott: self.token.clone(),
        };

        let request = self.request(Method::POST, "/sign").json(&body);
        let response = expect_success(self.send(request).await?).await?;

        let signed: SignResponse = decode_json(response).await?;
        info!("certificate signed");
        Ok(signed.crt)
    }

    /// Fetch a certificate by lowercase hex serial; `None` when the CA has no record
    pub async fn certificate(&self, serial: &str) -> ProviderResult<Option<Vec<u8>>> {
        let path = format!("/certificates/{}", urlencoding::encode(serial));
        let response = self.send(self.request(Method::GET, &path)).await?;

        match expect_found(response).await? {
            Some(response) => Ok(Some(read_bytes(response).await?)),
            None => Ok(None),
        }
    }

    /// CA version string
    pub async fn version(&self) -> ProviderResult<String> {
        let response = expect_success(self.send(self.request(Method::GET, "/version")).await?).await?;
        let body = read_bytes(response).await?;
        Ok(String::from_utf8_lossy(&body).trim().to_string())
    }

    /// Root certificate PEM as served by the CA
    pub async fn root_certificate(&self) -> ProviderResult<Vec<u8>> {
        let response = expect_success(self.send(self.request(Method::GET, "/root")).await?).await?;
        read_bytes(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(method = %method, path = %path, "CA request");
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Request carrying the admin bearer token
    fn admin_request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.request(method, path);
        match self.admin_token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> ProviderResult<Response> {
        Ok(request.send().await?)
    }
}

/// Turn any status >= 300 into `ProviderError::Remote`
async fn expect_success(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.as_u16() < 300 {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(status = %status, "CA returned error status");
    Err(ProviderError::remote(status, body))
}

/// Like `expect_success`, but 404 means the entity is absent
async fn expect_found(response: Response) -> ProviderResult<Option<Response>> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    expect_success(response).await.map(Some)
}

async fn read_bytes(response: Response) -> ProviderResult<Vec<u8>> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ProviderError::Transport(format!("Failed to read response body: {}", e)))?;
    Ok(bytes.to_vec())
}

async fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> ProviderResult<T> {
    let body = read_bytes(response).await?;
    Ok(serde_json::from_slice(&body)?)
}
