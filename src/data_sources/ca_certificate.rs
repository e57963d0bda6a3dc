//! `stepca_ca_certificate`
//!
//! Exposes the root certificate and its SHA-256 fingerprint, the value
//! `step ca bootstrap --fingerprint` expects.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::DataSource;
use crate::models::{Diagnostics, StateResponse};
use crate::resources::NOT_CONFIGURED;
use crate::services::CaInfoApi;
use crate::utils::error::ProviderError;
use crate::utils::x509::parse_certificate;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CaCertificateModel {
    /// Root certificate PEM as served by the CA
    pub certificate: String,
    /// Lowercase hex SHA-256 of the root's DER encoding
    pub fingerprint: Option<String>,
}

pub struct CaCertificateDataSource {
    client: Option<Arc<dyn CaInfoApi>>,
}

impl CaCertificateDataSource {
    pub fn new(client: Option<Arc<dyn CaInfoApi>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for CaCertificateDataSource {
    type Query = ();
    type Model = CaCertificateModel;

    fn type_name(&self) -> &'static str {
        "stepca_ca_certificate"
    }

    async fn read(&self, _query: &()) -> StateResponse<CaCertificateModel> {
        let Some(client) = self.client.as_ref() else {
            return StateResponse::failed(NOT_CONFIGURED, &ProviderError::NotConfigured);
        };

        let body = match client.root_certificate().await {
            Ok(body) => body,
            Err(e) => return StateResponse::failed("fetch failed", &e),
        };

        let mut diagnostics = Diagnostics::new();
        let fingerprint = match parse_certificate(&body) {
            Ok(parsed) => Some(parsed.fingerprint()),
            Err(e) => {
                diagnostics.add_warning("fingerprint unavailable", e.to_string());
                None
            }
        };

        StateResponse::set(CaCertificateModel {
            certificate: String::from_utf8_lossy(&body).into_owned(),
            fingerprint,
        })
        .with_diagnostics(diagnostics)
    }
}
