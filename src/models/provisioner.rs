//! Provisioner payloads for the admin API

use serde::{Deserialize, Serialize};

/// A provisioner as exchanged with `/admin/provisioners`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provisioner {
    pub name: String,
    /// Provisioner kind, e.g. `JWK`, `ACME`, `OIDC`
    #[serde(rename = "type")]
    pub provisioner_type: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x509_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation_template: Option<String>,
}
