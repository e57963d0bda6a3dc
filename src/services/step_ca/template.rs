//! Template endpoints

use reqwest::Method;
use tracing::info;
use urlencoding::encode;

use super::{decode_json, expect_found, expect_success, StepCaClient};
use crate::models::Template;
use crate::utils::error::ProviderResult;

impl StepCaClient {
    /// Store a template that can later be attached to a provisioner
    pub async fn create_template(&self, template: &Template) -> ProviderResult<()> {
        self.template_mutation(Method::POST, "/admin/templates".to_string(), template)
            .await?;
        info!(name = %template.name, "template created");
        Ok(())
    }

    /// Replace the template stored under `template.name`
    pub async fn update_template(&self, template: &Template) -> ProviderResult<()> {
        let path = format!("/admin/templates/{}", encode(&template.name));
        self.template_mutation(Method::PUT, path, template).await?;
        info!(name = %template.name, "template updated");
        Ok(())
    }

    /// Delete a template; an already-absent template is not an error
    pub async fn delete_template(&self, name: &str) -> ProviderResult<()> {
        let path = format!("/admin/templates/{}", encode(name));
        let request = self.admin_request(Method::DELETE, &path);
        if expect_found(self.send(request).await?).await?.is_some() {
            info!(name = %name, "template deleted");
        }
        Ok(())
    }

    /// Fetch a template by name
    pub async fn get_template(&self, name: &str) -> ProviderResult<Option<Template>> {
        let path = format!("/admin/templates/{}", encode(name));
        let request = self.admin_request(Method::GET, &path);
        match expect_found(self.send(request).await?).await? {
            Some(response) => Ok(Some(decode_json(response).await?)),
            None => Ok(None),
        }
    }

    async fn template_mutation(
        &self,
        method: Method,
        path: String,
        template: &Template,
    ) -> ProviderResult<()> {
        let request = self.admin_request(method, &path).json(template);
        expect_success(self.send(request).await?).await?;
        Ok(())
    }
}
