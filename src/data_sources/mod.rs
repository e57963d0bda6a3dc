//! Read-only data sources

use async_trait::async_trait;

use crate::models::StateResponse;

pub mod ca_certificate;
pub mod provisioners;
pub mod template;
pub mod version;

pub use ca_certificate::{CaCertificateDataSource, CaCertificateModel};
pub use provisioners::{ProvisionerItem, ProvisionersDataSource, ProvisionersModel};
pub use template::{get_template, TemplateDataModel, TemplateDataSource, TemplateQuery};
pub use version::{VersionDataSource, VersionModel};

/// A lookup against the CA that produces a value but manages nothing
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Arguments supplied by the caller
    type Query: Send + Sync;
    type Model: Send;

    fn type_name(&self) -> &'static str;

    async fn read(&self, query: &Self::Query) -> StateResponse<Self::Model>;
}
