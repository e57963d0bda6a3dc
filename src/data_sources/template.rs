//! `stepca_template`

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::DataSource;
use crate::models::{Diagnostics, StateResponse, Template};
use crate::resources::NOT_CONFIGURED;
use crate::services::TemplateReader;
use crate::utils::error::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateQuery {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TemplateDataModel {
    pub name: String,
    pub body: String,
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Fetch a template by name with metadata normalised
///
/// A missing template is an error here, unlike in the resource read path.
pub async fn get_template(reader: &dyn TemplateReader, name: &str) -> StateResponse<Template> {
    match reader.get_template(name).await {
        Ok(Some(template)) => StateResponse::set(Template {
            metadata: template.normalized_metadata(),
            ..template
        }),
        Ok(None) => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.add_error("template not found", format!("template {:?} was not found", name));
            StateResponse::removed().with_diagnostics(diagnostics)
        }
        Err(e) => StateResponse::failed("get template failed", &e),
    }
}

pub struct TemplateDataSource {
    client: Option<Arc<dyn TemplateReader>>,
}

impl TemplateDataSource {
    pub fn new(client: Option<Arc<dyn TemplateReader>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for TemplateDataSource {
    type Query = TemplateQuery;
    type Model = TemplateDataModel;

    fn type_name(&self) -> &'static str {
        "stepca_template"
    }

    async fn read(&self, query: &TemplateQuery) -> StateResponse<TemplateDataModel> {
        let Some(client) = self.client.as_ref() else {
            return StateResponse::failed(NOT_CONFIGURED, &ProviderError::NotConfigured);
        };

        let found = get_template(client.as_ref(), &query.name).await;
        StateResponse {
            state: found.state.map(|t| TemplateDataModel {
                name: query.name.clone(),
                body: t.body,
                metadata: t.metadata,
            }),
            diagnostics: found.diagnostics,
        }
    }
}
