//! Provider bootstrap
//!
//! Builds the CA client once from configuration and hands the same instance
//! to every reconciler and data source through its capability traits.

use std::sync::Arc;
use tracing::info;

use crate::config::ProviderConfig;
use crate::data_sources::{
    CaCertificateDataSource, ProvisionersDataSource, TemplateDataSource, VersionDataSource,
};
use crate::resources::{AdminResource, CertificateResource, ProvisionerResource, TemplateResource};
use crate::services::{
    AdminApi, CaInfoApi, CertificateApi, ProvisionerApi, StepCaClient, TemplateApi, TemplateReader,
};
use crate::utils::error::{ProviderError, ProviderResult};

/// The `stepca` provider
#[derive(Clone, Default)]
pub struct StepCaProvider {
    client: Option<Arc<StepCaClient>>,
}

impl StepCaProvider {
    pub const TYPE_NAME: &'static str = "stepca";

    pub const RESOURCE_TYPES: [&'static str; 4] = [
        "stepca_certificate",
        "stepca_provisioner",
        "stepca_admin",
        "stepca_template",
    ];

    pub const DATA_SOURCE_TYPES: [&'static str; 4] = [
        "stepca_version",
        "stepca_ca_certificate",
        "stepca_provisioners",
        "stepca_template",
    ];

    /// Validate configuration and build the shared client
    pub fn configure(config: &ProviderConfig) -> ProviderResult<Self> {
        config
            .validate()
            .map_err(|e| ProviderError::Config(format!("{:#}", e)))?;
        let client = StepCaClient::new(config)?;
        info!(ca_url = %client.base_url(), "provider configured");
        Ok(Self {
            client: Some(Arc::new(client)),
        })
    }

    /// A provider with no client; reconcilers report "provider not configured"
    /// and certificate refreshes skip verification
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&Arc<StepCaClient>> {
        self.client.as_ref()
    }

    pub fn certificate_resource(&self) -> CertificateResource {
        CertificateResource::new(self.client.clone().map(|c| c as Arc<dyn CertificateApi>))
    }

    pub fn provisioner_resource(&self) -> ProvisionerResource {
        ProvisionerResource::new(self.client.clone().map(|c| c as Arc<dyn ProvisionerApi>))
    }

    pub fn admin_resource(&self) -> AdminResource {
        AdminResource::new(self.client.clone().map(|c| c as Arc<dyn AdminApi>))
    }

    pub fn template_resource(&self) -> TemplateResource {
        TemplateResource::new(self.client.clone().map(|c| c as Arc<dyn TemplateApi>))
    }

    pub fn version_data_source(&self) -> VersionDataSource {
        VersionDataSource::new(self.client.clone().map(|c| c as Arc<dyn CaInfoApi>))
    }

    pub fn ca_certificate_data_source(&self) -> CaCertificateDataSource {
        CaCertificateDataSource::new(self.client.clone().map(|c| c as Arc<dyn CaInfoApi>))
    }

    pub fn provisioners_data_source(&self) -> ProvisionersDataSource {
        ProvisionersDataSource::new(self.client.clone().map(|c| c as Arc<dyn CaInfoApi>))
    }

    pub fn template_data_source(&self) -> TemplateDataSource {
        TemplateDataSource::new(self.client.clone().map(|c| c as Arc<dyn TemplateReader>))
    }
}
