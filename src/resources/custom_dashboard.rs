//! `instana_custom_dashboard`
//!
//! Widgets are kept as a JSON string. Reads re-serialize the server copy so
//! formatting differences do not show up as drift.

use super::application_config::{access_rules_from_api, access_rules_to_api, AccessRuleState};
use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::require_str;
use crate::restapi::{CustomDashboard, InstanaApi, RestResource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_custom_dashboard";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomDashboardState {
    pub id: String,
    pub title: String,
    pub access_rule: Option<Vec<AccessRuleState>>,
    pub widgets: Option<String>,
}

state_with_id!(CustomDashboardState);

pub struct CustomDashboardResource {
    metadata: ResourceMetadata,
}

impl CustomDashboardResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 0),
        }
    }
}

impl Default for CustomDashboardResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for CustomDashboardResource {
    type State = CustomDashboardState;
    type Api = CustomDashboard;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<CustomDashboard>> {
        api.custom_dashboards()
    }

    fn map_state_to_api(&self, state: &CustomDashboardState) -> Result<CustomDashboard> {
        let widgets = match state.widgets.as_deref().filter(|w| !w.trim().is_empty()) {
            Some(raw) => serde_json::from_str(raw).map_err(|e| {
                Error::invalid_configuration("widgets", format!("invalid JSON: {e}"))
            })?,
            None => Value::Array(Vec::new()),
        };
        Ok(CustomDashboard {
            id: state.id.clone(),
            title: require_str("title", &state.title)?.to_string(),
            access_rules: access_rules_to_api(state.access_rule.as_ref())?,
            widgets,
        })
    }

    fn update_state(
        &self,
        dashboard: &CustomDashboard,
        _previous: Option<&CustomDashboardState>,
    ) -> Result<CustomDashboardState> {
        Ok(CustomDashboardState {
            id: dashboard.id.clone(),
            title: dashboard.title.clone(),
            access_rule: access_rules_from_api(&dashboard.access_rules),
            widgets: Some(serde_json::to_string(&dashboard.widgets)?),
        })
    }
}
