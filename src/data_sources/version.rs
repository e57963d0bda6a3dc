//! `stepca_version`

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::DataSource;
use crate::models::StateResponse;
use crate::resources::NOT_CONFIGURED;
use crate::services::CaInfoApi;
use crate::utils::error::ProviderError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VersionModel {
    pub version: String,
}

pub struct VersionDataSource {
    client: Option<Arc<dyn CaInfoApi>>,
}

impl VersionDataSource {
    pub fn new(client: Option<Arc<dyn CaInfoApi>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for VersionDataSource {
    type Query = ();
    type Model = VersionModel;

    fn type_name(&self) -> &'static str {
        "stepca_version"
    }

    async fn read(&self, _query: &()) -> StateResponse<VersionModel> {
        let Some(client) = self.client.as_ref() else {
            return StateResponse::failed(NOT_CONFIGURED, &ProviderError::NotConfigured);
        };

        match client.version().await {
            Ok(version) => StateResponse::set(VersionModel { version }),
            Err(e) => StateResponse::failed("version fetch failed", &e),
        }
    }
}
