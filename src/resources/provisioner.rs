//! Provisioner reconciler

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::{effective_bool, non_empty, optional_eq, Resource, NOT_CONFIGURED};
use crate::models::{Diagnostics, Provisioner, StateResponse};
use crate::services::ProvisionerApi;
use crate::utils::error::ProviderError;

/// Tracked state of a `stepca_provisioner`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisionerModel {
    pub name: String,
    #[serde(rename = "type")]
    pub provisioner_type: String,
    #[serde(default)]
    pub admin: Option<bool>,
    #[serde(default)]
    pub x509_template: Option<String>,
    #[serde(default)]
    pub ssh_template: Option<String>,
    #[serde(default)]
    pub attestation_template: Option<String>,
}

impl ProvisionerModel {
    fn to_payload(&self) -> Provisioner {
        Provisioner {
            name: self.name.clone(),
            provisioner_type: self.provisioner_type.clone(),
            admin: effective_bool(self.admin),
            x509_template: self.x509_template.clone(),
            ssh_template: self.ssh_template.clone(),
            attestation_template: self.attestation_template.clone(),
        }
    }

    /// Overwrite the tracked fields with what the CA reports
    fn refresh_from(&mut self, remote: Provisioner) {
        self.provisioner_type = remote.provisioner_type;
        self.admin = Some(remote.admin);
        self.x509_template = non_empty(remote.x509_template);
        self.ssh_template = non_empty(remote.ssh_template);
        self.attestation_template = non_empty(remote.attestation_template);
    }

    /// Whether a replace is needed to move from `state` to `self`
    fn differs_from(&self, state: &ProvisionerModel) -> bool {
        effective_bool(self.admin) != effective_bool(state.admin)
            || !optional_eq(&self.x509_template, &state.x509_template)
            || !optional_eq(&self.ssh_template, &state.ssh_template)
            || !optional_eq(&self.attestation_template, &state.attestation_template)
    }
}

/// Reconciler for `stepca_provisioner`
#[derive(Clone)]
pub struct ProvisionerResource {
    client: Option<Arc<dyn ProvisionerApi>>,
}

impl ProvisionerResource {
    pub fn new(client: Option<Arc<dyn ProvisionerApi>>) -> Self {
        Self { client }
    }

    fn client(&self) -> Result<&Arc<dyn ProvisionerApi>, StateResponse<ProvisionerModel>> {
        self.client
            .as_ref()
            .ok_or_else(|| StateResponse::failed(NOT_CONFIGURED, &ProviderError::NotConfigured))
    }
}

#[async_trait]
impl Resource for ProvisionerResource {
    type Model = ProvisionerModel;

    fn type_name(&self) -> &'static str {
        "stepca_provisioner"
    }

    async fn create(&self, plan: ProvisionerModel) -> StateResponse<ProvisionerModel> {
        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        match client.create_provisioner(&plan.to_payload()).await {
            Ok(()) => StateResponse::set(plan),
            Err(e) => StateResponse::failed("create failed", &e),
        }
    }

    async fn read(&self, mut state: ProvisionerModel) -> StateResponse<ProvisionerModel> {
        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        match client.get_provisioner(&state.name).await {
            Ok(Some(remote)) => {
                state.refresh_from(remote);
                StateResponse::set(state)
            }
            Ok(None) => {
                debug!(name = %state.name, "provisioner gone, removing from state");
                StateResponse::removed()
            }
            Err(e) => StateResponse::failed("read failed", &e),
        }
    }

    async fn update(
        &self,
        mut plan: ProvisionerModel,
        state: ProvisionerModel,
    ) -> StateResponse<ProvisionerModel> {
        if plan.name != state.name {
            return StateResponse::failed(
                "name is immutable",
                &ProviderError::PolicyViolation(
                    "changing the name requires recreating the provisioner".to_string(),
                ),
            );
        }
        if plan.provisioner_type != state.provisioner_type {
            return StateResponse::failed(
                "type is immutable",
                &ProviderError::PolicyViolation(
                    "changing the type requires recreating the provisioner".to_string(),
                ),
            );
        }
        if !plan.differs_from(&state) {
            return StateResponse::set(plan);
        }

        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        if let Err(e) = client
            .replace_provisioner(&state.name, &plan.to_payload())
            .await
        {
            return StateResponse::failed("update failed", &e);
        }

        match client.get_provisioner(&plan.name).await {
            Ok(Some(remote)) => {
                plan.refresh_from(remote);
                StateResponse::set(plan)
            }
            Ok(None) => {
                let mut diagnostics = Diagnostics::new();
                diagnostics.add_error("read failed", "provisioner missing after update");
                StateResponse::removed().with_diagnostics(diagnostics)
            }
            Err(e) => StateResponse::failed("read failed", &e),
        }
    }

    async fn delete(&self, state: ProvisionerModel) -> StateResponse<ProvisionerModel> {
        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        match client.delete_provisioner(&state.name).await {
            Ok(()) => StateResponse::removed(),
            Err(e) => StateResponse::failed("delete failed", &e),
        }
    }
}
