//! Admin payloads for the admin API

use serde::{Deserialize, Serialize};

/// An admin as exchanged with `/admin/admins`
///
/// Identified remotely by the `(name, provisioner)` pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Admin {
    pub name: String,
    pub provisioner: String,
}
