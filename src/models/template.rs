//! Template payloads for the admin API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An X.509 or SSH template stored via `/admin/templates`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl Template {
    /// Metadata with the empty map folded into `None`
    pub fn normalized_metadata(&self) -> Option<BTreeMap<String, String>> {
        normalize_metadata(self.metadata.clone())
    }
}

/// Fold an empty metadata map into `None`
pub fn normalize_metadata(
    metadata: Option<BTreeMap<String, String>>,
) -> Option<BTreeMap<String, String>> {
    metadata.filter(|m| !m.is_empty())
}
