//! CA client and the capability traits reconcilers depend on

pub mod api;
pub mod step_ca;

pub use api::{AdminApi, CaInfoApi, CertificateApi, ProvisionerApi, TemplateApi, TemplateReader};
pub use step_ca::StepCaClient;
