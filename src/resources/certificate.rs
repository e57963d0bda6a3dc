//! Certificate reconciler
//!
//! Certificates are issued by signing a CSR and have no update endpoint: a
//! changed CSR or a flipped `force_rotate` flag re-signs. On refresh the
//! stored PEM is checked against the CA by serial number so that revoked or
//! superseded certificates drop out of state and get re-issued.
//!
//! A lookup failure keeps the certificate. Only a confirmed absence or a
//! confirmed mismatch removes it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{effective_bool, Resource, NOT_CONFIGURED};
use crate::models::{Diagnostics, StateResponse};
use crate::services::CertificateApi;
use crate::utils::error::ProviderError;
use crate::utils::x509::parse_certificate;

/// Tracked state of a `stepca_certificate`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificateModel {
    /// PEM-encoded certificate signing request
    pub csr: String,
    /// Issued certificate PEM, computed
    #[serde(default)]
    pub certificate: Option<String>,
    /// Flip to force a re-issue with an unchanged CSR
    #[serde(default)]
    pub force_rotate: Option<bool>,
}

/// Outcome of checking a stored certificate against the CA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateStatus {
    /// The CA returned a byte-identical certificate for the serial
    Verified,
    /// No client is configured, so the certificate was not checked
    Unverified,
    /// The lookup failed; kept until the CA can answer
    LookupFailed,
    /// The CA answered with something that is not a certificate
    RemoteUnparsable,
    /// Nothing stored
    Missing,
    /// The stored PEM is not a certificate
    Unparsable,
    /// The CA has no certificate under this serial
    Revoked,
    /// The CA holds a different certificate under this serial
    Drifted,
}

impl CertificateStatus {
    /// Whether the certificate stays in state
    pub fn keep(self) -> bool {
        matches!(
            self,
            CertificateStatus::Verified
                | CertificateStatus::Unverified
                | CertificateStatus::LookupFailed
                | CertificateStatus::RemoteUnparsable
        )
    }
}

/// Status plus the diagnostics explaining it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepDecision {
    pub status: CertificateStatus,
    pub diagnostics: Diagnostics,
}

impl KeepDecision {
    fn quiet(status: CertificateStatus) -> Self {
        Self {
            status,
            diagnostics: Diagnostics::new(),
        }
    }

    fn warning(status: CertificateStatus, summary: &str, detail: impl Into<String>) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_warning(summary, detail);
        Self {
            status,
            diagnostics,
        }
    }

    fn error(status: CertificateStatus, summary: &str, detail: impl Into<String>) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_error(summary, detail);
        Self {
            status,
            diagnostics,
        }
    }

    pub fn keep(&self) -> bool {
        self.status.keep()
    }
}

/// True iff the CSR text or the effective `force_rotate` value changed
pub fn needs_certificate_rotation(plan: &CertificateModel, state: &CertificateModel) -> bool {
    plan.csr != state.csr || effective_bool(plan.force_rotate) != effective_bool(state.force_rotate)
}

/// Reconciler for `stepca_certificate`
#[derive(Clone)]
pub struct CertificateResource {
    client: Option<Arc<dyn CertificateApi>>,
}

impl CertificateResource {
    pub fn new(client: Option<Arc<dyn CertificateApi>>) -> Self {
        Self { client }
    }

    /// Decide whether the certificate held in `model` stays in state
    pub async fn should_keep_certificate(&self, model: &CertificateModel) -> KeepDecision {
        let pem = match model.certificate.as_deref() {
            Some(pem) if !pem.is_empty() => pem,
            _ => {
                return KeepDecision::warning(
                    CertificateStatus::Missing,
                    "certificate missing",
                    "The certificate value is empty in state. Removing it so a new certificate can be requested.",
                )
            }
        };

        let local = match parse_certificate(pem.as_bytes()) {
            Ok(parsed) => parsed,
            Err(e) => {
                return KeepDecision::warning(
                    CertificateStatus::Unparsable,
                    "certificate parse failed",
                    format!(
                        "The stored certificate could not be parsed ({}). Removing it so the resource can be recreated.",
                        e
                    ),
                )
            }
        };

        let Some(client) = self.client.as_ref() else {
            debug!(serial = %local.serial, "no client configured, skipping certificate verification");
            return KeepDecision::quiet(CertificateStatus::Unverified);
        };

        let remote_pem = match client.certificate(&local.serial).await {
            Ok(Some(body)) => body,
            Ok(None) => {
                warn!(serial = %local.serial, "certificate not found at CA");
                return KeepDecision::warning(
                    CertificateStatus::Revoked,
                    "certificate revoked",
                    "The certificate could not be located via the CA API. Removing it from state so a new one can be issued.",
                );
            }
            Err(e) => {
                return KeepDecision::error(
                    CertificateStatus::LookupFailed,
                    "certificate lookup failed",
                    e.to_string(),
                )
            }
        };

        let remote = match parse_certificate(&remote_pem) {
            Ok(parsed) => parsed,
            Err(e) => {
                return KeepDecision::error(
                    CertificateStatus::RemoteUnparsable,
                    "certificate parse failed",
                    e.to_string(),
                )
            }
        };

        if remote.der != local.der {
            warn!(serial = %local.serial, "CA holds a different certificate for serial");
            return KeepDecision::warning(
                CertificateStatus::Drifted,
                "certificate drift detected",
                "The CA returned a different certificate for the stored serial number. Removing it from state so a new certificate can be requested.",
            );
        }

        KeepDecision::quiet(CertificateStatus::Verified)
    }

    /// Carry the certificate forward, or re-sign when rotation is needed
    ///
    /// A failed re-sign leaves `certificate` unset on the returned state.
    pub async fn apply_certificate_update(
        &self,
        mut plan: CertificateModel,
        state: &CertificateModel,
    ) -> StateResponse<CertificateModel> {
        if !needs_certificate_rotation(&plan, state) {
            plan.certificate = state.certificate.clone();
            return StateResponse::set(plan);
        }

        plan.certificate = None;
        let Some(client) = self.client.as_ref() else {
            return failed_with(plan, NOT_CONFIGURED, &ProviderError::NotConfigured);
        };

        match client.sign(&plan.csr).await {
            Ok(pem) => {
                plan.certificate = Some(pem);
                StateResponse::set(plan)
            }
            Err(e) => failed_with(plan, "sign failed", &e),
        }
    }
}

fn failed_with(
    plan: CertificateModel,
    summary: &str,
    err: &ProviderError,
) -> StateResponse<CertificateModel> {
    let mut diagnostics = Diagnostics::new();
    diagnostics.add_provider_error(summary, err);
    StateResponse::set(plan).with_diagnostics(diagnostics)
}

#[async_trait]
impl Resource for CertificateResource {
    type Model = CertificateModel;

    fn type_name(&self) -> &'static str {
        "stepca_certificate"
    }

    async fn create(&self, mut plan: CertificateModel) -> StateResponse<CertificateModel> {
        let Some(client) = self.client.as_ref() else {
            return StateResponse::failed(NOT_CONFIGURED, &ProviderError::NotConfigured);
        };

        match client.sign(&plan.csr).await {
            Ok(pem) => {
                plan.certificate = Some(pem);
                StateResponse::set(plan)
            }
            Err(e) => StateResponse::failed("sign failed", &e),
        }
    }

    async fn read(&self, state: CertificateModel) -> StateResponse<CertificateModel> {
        let decision = self.should_keep_certificate(&state).await;
        let response = if decision.keep() {
            StateResponse::set(state)
        } else {
            StateResponse::removed()
        };
        response.with_diagnostics(decision.diagnostics)
    }

    async fn update(
        &self,
        plan: CertificateModel,
        state: CertificateModel,
    ) -> StateResponse<CertificateModel> {
        self.apply_certificate_update(plan, &state).await
    }

    async fn delete(&self, _state: CertificateModel) -> StateResponse<CertificateModel> {
        // The CA exposes no revocation endpoint here; destroy only forgets.
        StateResponse::removed()
    }
}
