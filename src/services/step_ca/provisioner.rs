//! Provisioner endpoints

use reqwest::Method;
use tracing::info;
use urlencoding::encode;

use super::{decode_json, expect_found, expect_success, StepCaClient};
use crate::models::Provisioner;
use crate::utils::error::ProviderResult;

impl StepCaClient {
    /// List all provisioners
    pub async fn list_provisioners(&self) -> ProviderResult<Vec<Provisioner>> {
        let request = self.admin_request(Method::GET, "/admin/provisioners");
        let response = expect_success(self.send(request).await?).await?;
        decode_json(response).await
    }

    /// Create a provisioner
    pub async fn create_provisioner(&self, provisioner: &Provisioner) -> ProviderResult<()> {
        let request = self
            .admin_request(Method::POST, "/admin/provisioners")
            .json(provisioner);
        expect_success(self.send(request).await?).await?;
        info!(name = %provisioner.name, kind = %provisioner.provisioner_type, "provisioner created");
        Ok(())
    }

    /// Replace the provisioner stored under `name` with `provisioner`
    pub async fn replace_provisioner(
        &self,
        name: &str,
        provisioner: &Provisioner,
    ) -> ProviderResult<()> {
        let path = format!("/admin/provisioners/{}", encode(name));
        let request = self.admin_request(Method::PUT, &path).json(provisioner);
        expect_success(self.send(request).await?).await?;
        info!(name = %name, "provisioner replaced");
        Ok(())
    }

    /// Delete a provisioner; an already-absent provisioner is not an error
    pub async fn delete_provisioner(&self, name: &str) -> ProviderResult<()> {
        let path = format!("/admin/provisioners/{}", encode(name));
        let request = self.admin_request(Method::DELETE, &path);
        if expect_found(self.send(request).await?).await?.is_some() {
            info!(name = %name, "provisioner deleted");
        }
        Ok(())
    }

    /// Fetch a provisioner by name
    pub async fn get_provisioner(&self, name: &str) -> ProviderResult<Option<Provisioner>> {
        let path = format!("/admin/provisioners/{}", encode(name));
        let request = self.admin_request(Method::GET, &path);
        match expect_found(self.send(request).await?).await? {
            Some(response) => Ok(Some(decode_json(response).await?)),
            None => Ok(None),
        }
    }
}
