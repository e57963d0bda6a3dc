//! Capability traits
//!
//! Each reconciler depends on the narrowest slice of the CA surface it needs,
//! so tests can substitute in-memory doubles for [`StepCaClient`].

use async_trait::async_trait;

use super::step_ca::StepCaClient;
use crate::models::{Admin, Provisioner, Template};
use crate::utils::error::ProviderResult;

/// Signing and certificate lookup
#[async_trait]
pub trait CertificateApi: Send + Sync {
    async fn sign(&self, csr: &str) -> ProviderResult<String>;

    /// Raw certificate body for a lowercase hex serial, `None` when unknown
    async fn certificate(&self, serial: &str) -> ProviderResult<Option<Vec<u8>>>;
}

/// Provisioner administration
#[async_trait]
pub trait ProvisionerApi: Send + Sync {
    async fn create_provisioner(&self, provisioner: &Provisioner) -> ProviderResult<()>;
    async fn replace_provisioner(&self, name: &str, provisioner: &Provisioner)
        -> ProviderResult<()>;
    async fn delete_provisioner(&self, name: &str) -> ProviderResult<()>;
    async fn get_provisioner(&self, name: &str) -> ProviderResult<Option<Provisioner>>;
}

/// Admin administration, keyed by `(name, provisioner)`
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn create_admin(&self, admin: &Admin) -> ProviderResult<()>;
    async fn replace_admin(
        &self,
        current_name: &str,
        current_provisioner: &str,
        admin: &Admin,
    ) -> ProviderResult<()>;
    async fn delete_admin(&self, name: &str, provisioner: &str) -> ProviderResult<()>;
    async fn get_admin(&self, name: &str, provisioner: &str) -> ProviderResult<Option<Admin>>;
}

/// Template lookup
#[async_trait]
pub trait TemplateReader: Send + Sync {
    async fn get_template(&self, name: &str) -> ProviderResult<Option<Template>>;
}

/// Template administration
#[async_trait]
pub trait TemplateApi: TemplateReader {
    async fn create_template(&self, template: &Template) -> ProviderResult<()>;
    async fn update_template(&self, template: &Template) -> ProviderResult<()>;
    async fn delete_template(&self, name: &str) -> ProviderResult<()>;
}

/// Read-only CA information used by data sources
#[async_trait]
pub trait CaInfoApi: Send + Sync {
    async fn version(&self) -> ProviderResult<String>;
    async fn root_certificate(&self) -> ProviderResult<Vec<u8>>;
    async fn list_provisioners(&self) -> ProviderResult<Vec<Provisioner>>;
}

#[async_trait]
impl CertificateApi for StepCaClient {
    async fn sign(&self, csr: &str) -> ProviderResult<String> {
        StepCaClient::sign(self, csr).await
    }

    async fn certificate(&self, serial: &str) -> ProviderResult<Option<Vec<u8>>> {
        StepCaClient::certificate(self, serial).await
    }
}

#[async_trait]
impl ProvisionerApi for StepCaClient {
    async fn create_provisioner(&self, provisioner: &Provisioner) -> ProviderResult<()> {
        StepCaClient::create_provisioner(self, provisioner).await
    }

    async fn replace_provisioner(
        &self,
        name: &str,
        provisioner: &Provisioner,
    ) -> ProviderResult<()> {
        StepCaClient::replace_provisioner(self, name, provisioner).await
    }

    async fn delete_provisioner(&self, name: &str) -> ProviderResult<()> {
        StepCaClient::delete_provisioner(self, name).await
    }

    async fn get_provisioner(&self, name: &str) -> ProviderResult<Option<Provisioner>> {
        StepCaClient::get_provisioner(self, name).await
    }
}

#[async_trait]
impl AdminApi for StepCaClient {
    async fn create_admin(&self, admin: &Admin) -> ProviderResult<()> {
        StepCaClient::create_admin(self, admin).await
    }

    async fn replace_admin(
        &self,
        current_name: &str,
        current_provisioner: &str,
        admin: &Admin,
    ) -> ProviderResult<()> {
        StepCaClient::replace_admin(self, current_name, current_provisioner, admin).await
    }

    async fn delete_admin(&self, name: &str, provisioner: &str) -> ProviderResult<()> {
        StepCaClient::delete_admin(self, name, provisioner).await
    }

    async fn get_admin(&self, name: &str, provisioner: &str) -> ProviderResult<Option<Admin>> {
        StepCaClient::get_admin(self, name, provisioner).await
    }
}

#[async_trait]
impl TemplateReader for StepCaClient {
    async fn get_template(&self, name: &str) -> ProviderResult<Option<Template>> {
        StepCaClient::get_template(self, name).await
    }
}

#[async_trait]
impl TemplateApi for StepCaClient {
    async fn create_template(&self, template: &Template) -> ProviderResult<()> {
        StepCaClient::create_template(self, template).await
    }

    async fn update_template(&self, template: &Template) -> ProviderResult<()> {
        StepCaClient::update_template(self, template).await
    }

    async fn delete_template(&self, name: &str) -> ProviderResult<()> {
        StepCaClient::delete_template(self, name).await
    }
}

#[async_trait]
impl CaInfoApi for StepCaClient {
    async fn version(&self) -> ProviderResult<String> {
        StepCaClient::version(self).await
    }

    async fn root_certificate(&self) -> ProviderResult<Vec<u8>> {
        StepCaClient::root_certificate(self).await
    }

    async fn list_provisioners(&self) -> ProviderResult<Vec<Provisioner>> {
        StepCaClient::list_provisioners(self).await
    }
}
