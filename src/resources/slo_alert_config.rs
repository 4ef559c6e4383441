//! `instana_slo_alert_config`
//!
//! The state `alert_type` selects the wire rule: `status` and `error_budget`
//! take a static threshold, `burn_rate_v2` takes burn rate windows.

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{
    custom_payload_fields_from_api, custom_payload_fields_to_api, require, require_str,
    set_to_vec, severity_from_api, severity_to_api, validate_value, vec_to_set,
    CustomPayloadFieldState, THRESHOLD_OPERATORS,
};
use crate::restapi::slo_alert_config::{
    BurnRateConfig, BurnRateThreshold, SloAlertRule, SloAlertThreshold, SloAlertTimeThreshold,
    SLO_ALERT_TYPE_ERROR_BUDGET, SLO_ALERT_TYPE_SERVICE_LEVELS_OBJECTIVE,
    SLO_METRIC_BURNED_PERCENTAGE, SLO_METRIC_BURN_RATE_V2, SLO_METRIC_STATUS,
};
use crate::restapi::{InstanaApi, RestResource, SloAlertConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_slo_alert_config";

const ALERT_TYPE_STATUS: &str = "status";
const ALERT_TYPE_ERROR_BUDGET: &str = "error_budget";
const ALERT_TYPE_BURN_RATE_V2: &str = "burn_rate_v2";
const ALERT_TYPES: &[&str] = &[ALERT_TYPE_STATUS, ALERT_TYPE_ERROR_BUDGET, ALERT_TYPE_BURN_RATE_V2];
const STATIC_THRESHOLD: &str = "staticThreshold";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SloAlertConfigState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: String,
    pub triggering: bool,
    pub enabled: Option<bool>,
    pub alert_type: String,
    pub threshold: Option<ThresholdState>,
    pub time_threshold: TimeThresholdState,
    pub slo_ids: BTreeSet<String>,
    pub alert_channel_ids: BTreeSet<String>,
    pub burn_rate_config: Option<Vec<BurnRateConfigState>>,
    pub custom_payload_field: Option<Vec<CustomPayloadFieldState>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdState {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub operator: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeThresholdState {
    pub warm_up: i64,
    pub cool_down: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnRateConfigState {
    pub alert_window_type: String,
    pub duration: String,
    pub duration_unit_type: String,
    pub threshold_operator: String,
    pub threshold_value: f64,
}

state_with_id!(SloAlertConfigState);

fn rule_to_api(alert_type: &str) -> Result<SloAlertRule> {
    let (wire_type, metric) = match validate_value("alert_type", alert_type, ALERT_TYPES)? {
        ALERT_TYPE_STATUS => (SLO_ALERT_TYPE_SERVICE_LEVELS_OBJECTIVE, SLO_METRIC_STATUS),
        ALERT_TYPE_ERROR_BUDGET => (SLO_ALERT_TYPE_ERROR_BUDGET, SLO_METRIC_BURNED_PERCENTAGE),
        _ => (SLO_ALERT_TYPE_ERROR_BUDGET, SLO_METRIC_BURN_RATE_V2),
    };
    Ok(SloAlertRule {
        alert_type: wire_type.to_string(),
        metric: metric.to_string(),
    })
}

fn alert_type_from_api(rule: &SloAlertRule) -> Result<&'static str> {
    match (rule.alert_type.as_str(), rule.metric.as_str()) {
        (SLO_ALERT_TYPE_SERVICE_LEVELS_OBJECTIVE, _) => Ok(ALERT_TYPE_STATUS),
        (SLO_ALERT_TYPE_ERROR_BUDGET, SLO_METRIC_BURN_RATE_V2) => Ok(ALERT_TYPE_BURN_RATE_V2),
        (SLO_ALERT_TYPE_ERROR_BUDGET, _) => Ok(ALERT_TYPE_ERROR_BUDGET),
        (other, metric) => Err(Error::malformed(format!(
            "unsupported slo alert rule '{other}' with metric '{metric}'"
        ))),
    }
}

pub struct SloAlertConfigResource {
    metadata: ResourceMetadata,
}

impl SloAlertConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 1),
        }
    }
}

impl Default for SloAlertConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for SloAlertConfigResource {
    type State = SloAlertConfigState;
    type Api = SloAlertConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<SloAlertConfig>> {
        api.slo_alert_configs()
    }

    fn map_state_to_api(&self, state: &SloAlertConfigState) -> Result<SloAlertConfig> {
        let rule = rule_to_api(&state.alert_type)?;
        let burn_rate = state.alert_type == ALERT_TYPE_BURN_RATE_V2;

        let threshold = if burn_rate {
            None
        } else {
            let threshold = require("threshold", state.threshold.as_ref())?;
            Some(SloAlertThreshold {
                kind: threshold
                    .kind
                    .clone()
                    .unwrap_or_else(|| STATIC_THRESHOLD.to_string()),
                operator: validate_value("threshold.operator", &threshold.operator, THRESHOLD_OPERATORS)?
                    .to_string(),
                value: threshold.value,
            })
        };

        let burn_rate_configs = match (burn_rate, state.burn_rate_config.as_ref()) {
            (true, Some(configs)) if !configs.is_empty() => configs
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    Ok(BurnRateConfig {
                        alert_window_type: c.alert_window_type.clone(),
                        duration: c.duration.clone(),
                        duration_unit_type: c.duration_unit_type.clone(),
                        threshold: BurnRateThreshold {
                            operator: validate_value(
                                &format!("burn_rate_config[{i}].threshold_operator"),
                                &c.threshold_operator,
                                THRESHOLD_OPERATORS,
                            )?
                            .to_string(),
                            value: c.threshold_value,
                        },
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            (true, _) => {
                return Err(Error::invalid_configuration(
                    "burn_rate_config",
                    "burn_rate_v2 alerts require at least one burn rate config",
                ))
            }
            (false, _) => Vec::new(),
        };

        Ok(SloAlertConfig {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            description: state.description.clone(),
            severity: severity_to_api("severity", &state.severity)?,
            triggering: state.triggering,
            enabled: state.enabled.unwrap_or(true),
            rule,
            threshold,
            time_threshold: SloAlertTimeThreshold {
                time_window: state.time_threshold.warm_up,
                expiry: state.time_threshold.cool_down,
            },
            slo_ids: set_to_vec(&state.slo_ids),
            alert_channel_ids: set_to_vec(&state.alert_channel_ids),
            burn_rate_configs,
            custom_payload_fields: custom_payload_fields_to_api(state.custom_payload_field.as_ref())?,
        })
    }

    fn update_state(
        &self,
        config: &SloAlertConfig,
        _previous: Option<&SloAlertConfigState>,
    ) -> Result<SloAlertConfigState> {
        let burn_rate_config = (!config.burn_rate_configs.is_empty()).then(|| {
            config
                .burn_rate_configs
                .iter()
                .map(|c| BurnRateConfigState {
                    alert_window_type: c.alert_window_type.clone(),
                    duration: c.duration.clone(),
                    duration_unit_type: c.duration_unit_type.clone(),
                    threshold_operator: c.threshold.operator.clone(),
                    threshold_value: c.threshold.value,
                })
                .collect()
        });

        Ok(SloAlertConfigState {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            severity: severity_from_api(config.severity)?,
            triggering: config.triggering,
            enabled: Some(config.enabled),
            alert_type: alert_type_from_api(&config.rule)?.to_string(),
            threshold: config.threshold.as_ref().map(|t| ThresholdState {
                kind: Some(t.kind.clone()),
                operator: t.operator.clone(),
                value: t.value,
            }),
            time_threshold: TimeThresholdState {
                warm_up: config.time_threshold.time_window,
                cool_down: config.time_threshold.expiry,
            },
            slo_ids: vec_to_set(&config.slo_ids),
            alert_channel_ids: vec_to_set(&config.alert_channel_ids),
            burn_rate_config,
            custom_payload_field: custom_payload_fields_from_api(&config.custom_payload_fields),
        })
    }
}
