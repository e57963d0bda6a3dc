//! Admin endpoints
//!
//! Admins are addressed by name in the path and by provisioner in the query.

use reqwest::Method;
use tracing::info;
use urlencoding::encode;

use super::{decode_json, expect_found, expect_success, StepCaClient};
use crate::models::Admin;
use crate::utils::error::ProviderResult;

fn admin_path(name: &str, provisioner: &str) -> String {
    format!(
        "/admin/admins/{}?provisioner={}",
        encode(name),
        encode(provisioner)
    )
}

impl StepCaClient {
    /// Create an admin
    pub async fn create_admin(&self, admin: &Admin) -> ProviderResult<()> {
        let request = self.admin_request(Method::POST, "/admin/admins").json(admin);
        expect_success(self.send(request).await?).await?;
        info!(name = %admin.name, provisioner = %admin.provisioner, "admin created");
        Ok(())
    }

    /// Replace the admin currently identified by `(current_name, current_provisioner)`
    pub async fn replace_admin(
        &self,
        current_name: &str,
        current_provisioner: &str,
        admin: &Admin,
    ) -> ProviderResult<()> {
        let path = admin_path(current_name, current_provisioner);
        let request = self.admin_request(Method::PUT, &path).json(admin);
        expect_success(self.send(request).await?).await?;
        info!(
            name = %admin.name,
            from = %current_provisioner,
            to = %admin.provisioner,
            "admin replaced"
        );
        Ok(())
    }

    /// Delete an admin; an already-absent admin is not an error
    pub async fn delete_admin(&self, name: &str, provisioner: &str) -> ProviderResult<()> {
        let request = self.admin_request(Method::DELETE, &admin_path(name, provisioner));
        if expect_found(self.send(request).await?).await?.is_some() {
            info!(name = %name, provisioner = %provisioner, "admin deleted");
        }
        Ok(())
    }

    /// Fetch an admin by its composite key
    pub async fn get_admin(&self, name: &str, provisioner: &str) -> ProviderResult<Option<Admin>> {
        let request = self.admin_request(Method::GET, &admin_path(name, provisioner));
        match expect_found(self.send(request).await?).await? {
            Some(response) => Ok(Some(decode_json(response).await?)),
            None => Ok(None),
        }
    }
}
