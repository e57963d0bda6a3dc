//! Admin reconciler
//!
//! The CA identifies an admin by `(name, provisioner)`. Moving an admin to a
//! different provisioner is a replace addressed by the old pair.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::{Resource, NOT_CONFIGURED};
use crate::models::{Admin, Diagnostics, StateResponse};
use crate::services::AdminApi;
use crate::utils::error::ProviderError;

/// Tracked state of a `stepca_admin`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminModel {
    pub name: String,
    pub provisioner_name: String,
}

impl AdminModel {
    fn to_payload(&self) -> Admin {
        Admin {
            name: self.name.clone(),
            provisioner: self.provisioner_name.clone(),
        }
    }
}

/// Reconciler for `stepca_admin`
#[derive(Clone)]
pub struct AdminResource {
    client: Option<Arc<dyn AdminApi>>,
}

impl AdminResource {
    pub fn new(client: Option<Arc<dyn AdminApi>>) -> Self {
        Self { client }
    }

    fn client(&self) -> Result<&Arc<dyn AdminApi>, StateResponse<AdminModel>> {
        self.client
            .as_ref()
            .ok_or_else(|| StateResponse::failed(NOT_CONFIGURED, &ProviderError::NotConfigured))
    }
}

#[async_trait]
impl Resource for AdminResource {
    type Model = AdminModel;

    fn type_name(&self) -> &'static str {
        "stepca_admin"
    }

    async fn create(&self, plan: AdminModel) -> StateResponse<AdminModel> {
        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        match client.create_admin(&plan.to_payload()).await {
            Ok(()) => StateResponse::set(plan),
            Err(e) => StateResponse::failed("create failed", &e),
        }
    }

    async fn read(&self, mut state: AdminModel) -> StateResponse<AdminModel> {
        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        match client.get_admin(&state.name, &state.provisioner_name).await {
            Ok(Some(remote)) => {
                state.provisioner_name = remote.provisioner;
                StateResponse::set(state)
            }
            Ok(None) => {
                debug!(name = %state.name, provisioner = %state.provisioner_name, "admin gone, removing from state");
                StateResponse::removed()
            }
            Err(e) => StateResponse::failed("read failed", &e),
        }
    }

    async fn update(&self, mut plan: AdminModel, state: AdminModel) -> StateResponse<AdminModel> {
        if plan.name != state.name {
            return StateResponse::failed(
                "name is immutable",
                &ProviderError::PolicyViolation(
                    "changing the admin name requires recreating the resource".to_string(),
                ),
            );
        }
        if plan.provisioner_name == state.provisioner_name {
            return StateResponse::set(state);
        }

        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        if let Err(e) = client
            .replace_admin(&state.name, &state.provisioner_name, &plan.to_payload())
            .await
        {
            return StateResponse::failed("update failed", &e);
        }

        match client.get_admin(&plan.name, &plan.provisioner_name).await {
            Ok(Some(remote)) => {
                plan.provisioner_name = remote.provisioner;
                StateResponse::set(plan)
            }
            Ok(None) => {
                let mut diagnostics = Diagnostics::new();
                diagnostics.add_error("read failed", "admin missing after update");
                StateResponse::removed().with_diagnostics(diagnostics)
            }
            Err(e) => StateResponse::failed("read failed", &e),
        }
    }

    async fn delete(&self, state: AdminModel) -> StateResponse<AdminModel> {
        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        match client.delete_admin(&state.name, &state.provisioner_name).await {
            Ok(()) => StateResponse::removed(),
            Err(e) => StateResponse::failed("delete failed", &e),
        }
    }
}
