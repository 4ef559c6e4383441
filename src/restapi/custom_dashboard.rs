//! Custom dashboards

use super::application_config::AccessRule;
use super::object::data_object_with_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dashboard; widgets are opaque to the provider
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDashboard {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub access_rules: Vec<AccessRule>,
    #[serde(default)]
    pub widgets: Value,
}

data_object_with_id!(CustomDashboard);
