//! Website monitoring configs

use super::object::data_object_with_id;
use serde::{Deserialize, Serialize};

/// Monitored website; the server assigns `appName`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteMonitoringConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub app_name: String,
}

data_object_with_id!(WebsiteMonitoringConfig);
