//! `instana_website_monitoring_config`
//!
//! The server assigns both the ID and `app_name`.

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::Result;
use crate::mapping::require_str;
use crate::restapi::{InstanaApi, RestResource, WebsiteMonitoringConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_website_monitoring_config";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteMonitoringConfigState {
    pub id: String,
    pub name: String,
    pub app_name: Option<String>,
}

state_with_id!(WebsiteMonitoringConfigState);

pub struct WebsiteMonitoringConfigResource {
    metadata: ResourceMetadata,
}

impl WebsiteMonitoringConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 1).skip_id_generation(),
        }
    }
}

impl Default for WebsiteMonitoringConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for WebsiteMonitoringConfigResource {
    type State = WebsiteMonitoringConfigState;
    type Api = WebsiteMonitoringConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<WebsiteMonitoringConfig>> {
        api.website_monitoring_configs()
    }

    fn graft_state(&self, plan: &mut WebsiteMonitoringConfigState, state: &WebsiteMonitoringConfigState) {
        plan.id = state.id.clone();
        plan.app_name = state.app_name.clone();
    }

    fn map_state_to_api(&self, state: &WebsiteMonitoringConfigState) -> Result<WebsiteMonitoringConfig> {
        Ok(WebsiteMonitoringConfig {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            app_name: state.app_name.clone().unwrap_or_default(),
        })
    }

    fn update_state(
        &self,
        config: &WebsiteMonitoringConfig,
        _previous: Option<&WebsiteMonitoringConfigState>,
    ) -> Result<WebsiteMonitoringConfigState> {
        Ok(WebsiteMonitoringConfigState {
            id: config.id.clone(),
            name: config.name.clone(),
            app_name: Some(config.app_name.clone()).filter(|n| !n.is_empty()),
        })
    }
}
