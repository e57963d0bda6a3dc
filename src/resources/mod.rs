//! Resource reconcilers
//!
//! Each reconciler maps desired state onto the CA's CRUD endpoints and
//! reports the resulting state plus diagnostics. Reconcilers never return
//! errors directly; failures become error diagnostics on the response.

use async_trait::async_trait;

use crate::models::StateResponse;

pub mod admin;
pub mod certificate;
pub mod provisioner;
pub mod template;

pub use admin::{AdminModel, AdminResource};
pub use certificate::{
    needs_certificate_rotation, CertificateModel, CertificateResource, CertificateStatus,
    KeepDecision,
};
pub use provisioner::{ProvisionerModel, ProvisionerResource};
pub use template::{TemplateModel, TemplateResource};

/// Summary used whenever a reconciler was built without a client
pub(crate) const NOT_CONFIGURED: &str = "provider not configured";

/// Lifecycle operations shared by every resource type
#[async_trait]
pub trait Resource: Send + Sync {
    type Model: Clone + Send + Sync;

    /// Type name as exposed to the orchestrator, e.g. `stepca_provisioner`
    fn type_name(&self) -> &'static str;

    async fn create(&self, plan: Self::Model) -> StateResponse<Self::Model>;

    /// Refresh tracked state; `state: None` on the response means the entity is gone
    async fn read(&self, state: Self::Model) -> StateResponse<Self::Model>;

    async fn update(&self, plan: Self::Model, state: Self::Model) -> StateResponse<Self::Model>;

    async fn delete(&self, state: Self::Model) -> StateResponse<Self::Model>;
}

/// Unset booleans count as `false`
pub fn effective_bool(value: Option<bool>) -> bool {
    value.unwrap_or(false)
}

/// Absent equals absent, absent differs from present
pub fn optional_eq<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> bool {
    a == b
}

/// Empty strings from the remote are tracked as unset
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
