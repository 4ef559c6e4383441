//! Host agents (read-only)

use super::object::InstanaDataObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostAgent {
    pub snapshot_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub plugin: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl InstanaDataObject for HostAgent {
    fn id_for_path(&self) -> &str {
        &self.snapshot_id
    }
}
