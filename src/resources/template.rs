//! Template reconciler

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::{Resource, NOT_CONFIGURED};
use crate::models::{normalize_metadata, StateResponse, Template};
use crate::services::TemplateApi;
use crate::utils::error::ProviderError;

/// Tracked state of a `stepca_template`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateModel {
    pub name: String,
    pub body: String,
    /// `None` whenever there is no metadata, never an empty map
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl TemplateModel {
    fn to_payload(&self) -> Template {
        Template {
            name: self.name.clone(),
            body: self.body.clone(),
            metadata: normalize_metadata(self.metadata.clone()),
        }
    }

    fn normalized(mut self) -> Self {
        self.metadata = normalize_metadata(self.metadata);
        self
    }
}

/// Reconciler for `stepca_template`
#[derive(Clone)]
pub struct TemplateResource {
    client: Option<Arc<dyn TemplateApi>>,
}

impl TemplateResource {
    pub fn new(client: Option<Arc<dyn TemplateApi>>) -> Self {
        Self { client }
    }

    fn client(&self) -> Result<&Arc<dyn TemplateApi>, StateResponse<TemplateModel>> {
        self.client
            .as_ref()
            .ok_or_else(|| StateResponse::failed(NOT_CONFIGURED, &ProviderError::NotConfigured))
    }
}

#[async_trait]
impl Resource for TemplateResource {
    type Model = TemplateModel;

    fn type_name(&self) -> &'static str {
        "stepca_template"
    }

    async fn create(&self, plan: TemplateModel) -> StateResponse<TemplateModel> {
        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        match client.create_template(&plan.to_payload()).await {
            Ok(()) => StateResponse::set(plan.normalized()),
            Err(e) => StateResponse::failed("create failed", &e),
        }
    }

    async fn read(&self, mut state: TemplateModel) -> StateResponse<TemplateModel> {
        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        match client.get_template(&state.name).await {
            Ok(Some(remote)) => {
                state.metadata = remote.normalized_metadata();
                state.body = remote.body;
                StateResponse::set(state)
            }
            Ok(None) => {
                debug!(name = %state.name, "template gone, removing from state");
                StateResponse::removed()
            }
            Err(e) => StateResponse::failed("read failed", &e),
        }
    }

    async fn update(&self, plan: TemplateModel, state: TemplateModel) -> StateResponse<TemplateModel> {
        if plan.name != state.name {
            return StateResponse::failed(
                "name is immutable",
                &ProviderError::PolicyViolation(
                    "changing the name requires recreating the template".to_string(),
                ),
            );
        }

        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        match client.update_template(&plan.to_payload()).await {
            Ok(()) => StateResponse::set(plan.normalized()),
            Err(e) => StateResponse::failed("update failed", &e),
        }
    }

    async fn delete(&self, state: TemplateModel) -> StateResponse<TemplateModel> {
        let client = match self.client() {
            Ok(client) => client,
            Err(resp) => return resp,
        };

        match client.delete_template(&state.name).await {
            Ok(()) => StateResponse::removed(),
            Err(e) => StateResponse::failed("delete failed", &e),
        }
    }
}
