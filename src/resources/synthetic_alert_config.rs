//! `instana_synthetic_alert_config`

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::Result;
use crate::mapping::{
    custom_payload_fields_from_api, custom_payload_fields_to_api, require_str, set_to_vec,
    severity_from_api, severity_to_api, tag_filter_from_api, tag_filter_to_api, vec_to_set,
    CustomPayloadFieldState,
};
use crate::restapi::synthetic_alert_config::{SyntheticAlertRule, SyntheticAlertTimeThreshold};
use crate::restapi::{InstanaApi, RestResource, SyntheticAlertConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_synthetic_alert_config";

const DEFAULT_ALERT_TYPE: &str = "failure";
const DEFAULT_METRIC_NAME: &str = "synthetic.status";
const DEFAULT_TIME_THRESHOLD_TYPE: &str = "violationsInSequence";
const DEFAULT_SEVERITY: &str = "warning";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticAlertConfigState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub synthetic_test_ids: BTreeSet<String>,
    pub severity: Option<String>,
    pub tag_filter: Option<String>,
    pub rule: RuleState,
    pub alert_channel_ids: BTreeSet<String>,
    pub time_threshold: TimeThresholdState,
    pub grace_period: Option<i64>,
    pub custom_payload_field: Option<Vec<CustomPayloadFieldState>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleState {
    pub alert_type: Option<String>,
    pub metric_name: Option<String>,
    pub aggregation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeThresholdState {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub violations_count: i32,
}

state_with_id!(SyntheticAlertConfigState);

pub struct SyntheticAlertConfigResource {
    metadata: ResourceMetadata,
}

impl SyntheticAlertConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 0),
        }
    }
}

impl Default for SyntheticAlertConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for SyntheticAlertConfigResource {
    type State = SyntheticAlertConfigState;
    type Api = SyntheticAlertConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<SyntheticAlertConfig>> {
        api.synthetic_alert_configs()
    }

    fn map_state_to_api(&self, state: &SyntheticAlertConfigState) -> Result<SyntheticAlertConfig> {
        let severity = state.severity.as_deref().unwrap_or(DEFAULT_SEVERITY);
        Ok(SyntheticAlertConfig {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            description: state.description.clone(),
            synthetic_test_ids: set_to_vec(&state.synthetic_test_ids),
            severity: severity_to_api("severity", severity)?,
            tag_filter_expression: tag_filter_to_api("tag_filter", state.tag_filter.as_deref())?,
            rule: SyntheticAlertRule {
                alert_type: state
                    .rule
                    .alert_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ALERT_TYPE.to_string()),
                metric_name: state
                    .rule
                    .metric_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_METRIC_NAME.to_string()),
                aggregation: state.rule.aggregation.clone(),
            },
            alert_channel_ids: set_to_vec(&state.alert_channel_ids),
            time_threshold: SyntheticAlertTimeThreshold {
                kind: state
                    .time_threshold
                    .kind
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TIME_THRESHOLD_TYPE.to_string()),
                violations_count: state.time_threshold.violations_count,
            },
            grace_period: state.grace_period,
            custom_payload_fields: custom_payload_fields_to_api(state.custom_payload_field.as_ref())?,
        })
    }

    fn update_state(
        &self,
        config: &SyntheticAlertConfig,
        _previous: Option<&SyntheticAlertConfigState>,
    ) -> Result<SyntheticAlertConfigState> {
        Ok(SyntheticAlertConfigState {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            synthetic_test_ids: vec_to_set(&config.synthetic_test_ids),
            severity: Some(severity_from_api(config.severity)?),
            tag_filter: tag_filter_from_api(config.tag_filter_expression.as_ref())?,
            rule: RuleState {
                alert_type: Some(config.rule.alert_type.clone()),
                metric_name: Some(config.rule.metric_name.clone()),
                aggregation: config.rule.aggregation.clone(),
            },
            alert_channel_ids: vec_to_set(&config.alert_channel_ids),
            time_threshold: TimeThresholdState {
                kind: Some(config.time_threshold.kind.clone()),
                violations_count: config.time_threshold.violations_count,
            },
            grace_period: config.grace_period,
            custom_payload_field: custom_payload_fields_from_api(&config.custom_payload_fields),
        })
    }
}
