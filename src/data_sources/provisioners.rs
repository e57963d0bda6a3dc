//! `stepca_provisioners`

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::DataSource;
use crate::models::StateResponse;
use crate::resources::NOT_CONFIGURED;
use crate::services::CaInfoApi;
use crate::utils::error::ProviderError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProvisionerItem {
    pub name: String,
    #[serde(rename = "type")]
    pub provisioner_type: String,
    pub admin: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProvisionersModel {
    pub provisioners: Vec<ProvisionerItem>,
}

pub struct ProvisionersDataSource {
    client: Option<Arc<dyn CaInfoApi>>,
}

impl ProvisionersDataSource {
    pub fn new(client: Option<Arc<dyn CaInfoApi>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ProvisionersDataSource {
    type Query = ();
    type Model = ProvisionersModel;

    fn type_name(&self) -> &'static str {
        "stepca_provisioners"
    }

    async fn read(&self, _query: &()) -> StateResponse<ProvisionersModel> {
        let Some(client) = self.client.as_ref() else {
            return StateResponse::failed(NOT_CONFIGURED, &ProviderError::NotConfigured);
        };

        match client.list_provisioners().await {
            Ok(items) => StateResponse::set(ProvisionersModel {
                provisioners: items
                    .into_iter()
                    .map(|p| ProvisionerItem {
                        name: p.name,
                        provisioner_type: p.provisioner_type,
                        admin: p.admin,
                    })
                    .collect(),
            }),
            Err(e) => StateResponse::failed("failed to list provisioners", &e),
        }
    }
}
