//! `instana_alerting_config`
//!
//! Event types are stored lower-case whatever casing the API returns.

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{
    custom_payload_fields_from_api, custom_payload_fields_to_api, require_str, set_to_vec,
    validate_value, vec_to_set, CustomPayloadFieldState,
};
use crate::restapi::alerting_config::{EventFilteringConfiguration, ALERT_EVENT_TYPES};
use crate::restapi::{AlertingConfiguration, InstanaApi, RestResource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_alerting_config";

const MAX_ALERT_NAME_LENGTH: usize = 256;
const MAX_QUERY_LENGTH: usize = 2048;
const MAX_IDS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertingConfigState {
    pub id: String,
    pub alert_name: String,
    pub integration_ids: BTreeSet<String>,
    pub event_filter_query: Option<String>,
    pub event_filter_event_types: BTreeSet<String>,
    pub event_filter_rule_ids: BTreeSet<String>,
    pub custom_payload_field: Option<Vec<CustomPayloadFieldState>>,
}

state_with_id!(AlertingConfigState);

fn check_ids(field: &str, ids: &BTreeSet<String>) -> Result<Vec<String>> {
    if ids.len() > MAX_IDS {
        return Err(Error::invalid_configuration(
            field,
            format!("at most {MAX_IDS} entries are allowed"),
        ));
    }
    Ok(set_to_vec(ids))
}

fn event_types_to_api(types: &BTreeSet<String>) -> Result<Vec<String>> {
    types
        .iter()
        .map(|t| {
            let lower = t.to_ascii_lowercase();
            validate_value("event_filter_event_types", &lower, ALERT_EVENT_TYPES).map(str::to_string)
        })
        .collect()
}

pub struct AlertingConfigResource {
    metadata: ResourceMetadata,
}

impl AlertingConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 2),
        }
    }
}

impl Default for AlertingConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for AlertingConfigResource {
    type State = AlertingConfigState;
    type Api = AlertingConfiguration;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<AlertingConfiguration>> {
        api.alerting_configs()
    }

    fn map_state_to_api(&self, state: &AlertingConfigState) -> Result<AlertingConfiguration> {
        let alert_name = require_str("alert_name", &state.alert_name)?;
        if alert_name.chars().count() > MAX_ALERT_NAME_LENGTH {
            return Err(Error::invalid_configuration(
                "alert_name",
                format!("must be at most {MAX_ALERT_NAME_LENGTH} characters"),
            ));
        }
        if let Some(query) = state.event_filter_query.as_deref() {
            if query.chars().count() > MAX_QUERY_LENGTH {
                return Err(Error::invalid_configuration(
                    "event_filter_query",
                    format!("must be at most {MAX_QUERY_LENGTH} characters"),
                ));
            }
        }

        Ok(AlertingConfiguration {
            id: state.id.clone(),
            alert_name: alert_name.to_string(),
            integration_ids: check_ids("integration_ids", &state.integration_ids)?,
            event_filtering_configuration: EventFilteringConfiguration {
                query: state.event_filter_query.clone(),
                rule_ids: check_ids("event_filter_rule_ids", &state.event_filter_rule_ids)?,
                event_types: event_types_to_api(&state.event_filter_event_types)?,
            },
            custom_payload_fields: custom_payload_fields_to_api(state.custom_payload_field.as_ref())?,
        })
    }

    fn update_state(
        &self,
        config: &AlertingConfiguration,
        _previous: Option<&AlertingConfigState>,
    ) -> Result<AlertingConfigState> {
        let filter = &config.event_filtering_configuration;
        Ok(AlertingConfigState {
            id: config.id.clone(),
            alert_name: config.alert_name.clone(),
            integration_ids: vec_to_set(&config.integration_ids),
            event_filter_query: filter.query.clone(),
            event_filter_event_types: filter
                .event_types
                .iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
            event_filter_rule_ids: vec_to_set(&filter.rule_ids),
            custom_payload_field: custom_payload_fields_from_api(&config.custom_payload_fields),
        })
    }
}
