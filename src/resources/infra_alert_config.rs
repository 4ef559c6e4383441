//! `instana_infra_alert_config`

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{
    custom_payload_fields_from_api, custom_payload_fields_to_api, require, require_str,
    severity_thresholds_from_api, severity_thresholds_to_api, tag_filter_from_api,
    tag_filter_to_api, validate_value, AlertChannelsState, CustomPayloadFieldState,
    SeverityThresholdsState, THRESHOLD_OPERATORS,
};
use crate::restapi::infra_alert_config::{
    InfraAlertRule, InfraTimeThreshold, INFRA_ALERT_EVALUATION_TYPES,
};
use crate::restapi::{InfraAlertConfig, InstanaApi, RestResource, RuleWithThreshold};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_infra_alert_config";

const DEFAULT_GRANULARITY: i64 = 600_000;
const DEFAULT_EVALUATION_TYPE: &str = "CUSTOM";
const ALERT_TYPE_GENERIC_RULE: &str = "genericRule";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfraAlertConfigState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tag_filter: Option<String>,
    pub group_by: Vec<String>,
    pub granularity: Option<i64>,
    pub evaluation_type: Option<String>,
    pub alert_channels: Option<AlertChannelsState>,
    pub rules: RulesState,
    pub time_threshold: Option<TimeThresholdState>,
    pub custom_payload_field: Option<Vec<CustomPayloadFieldState>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesState {
    pub generic_rule: Option<GenericRuleState>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericRuleState {
    pub metric_name: String,
    pub entity_type: String,
    pub aggregation: Option<String>,
    pub cross_series_aggregation: Option<String>,
    pub regex: bool,
    pub threshold_operator: String,
    pub threshold: SeverityThresholdsState,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeThresholdState {
    pub violations_in_sequence: Option<ViolationsInSequenceState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationsInSequenceState {
    pub time_window: Option<i64>,
}

state_with_id!(InfraAlertConfigState);

fn generic_rule_to_api(rule: &GenericRuleState) -> Result<RuleWithThreshold<InfraAlertRule>> {
    let field = "rules.generic_rule";
    Ok(RuleWithThreshold {
        threshold_operator: validate_value(
            &format!("{field}.threshold_operator"),
            &rule.threshold_operator,
            THRESHOLD_OPERATORS,
        )?
        .to_string(),
        rule: InfraAlertRule {
            alert_type: ALERT_TYPE_GENERIC_RULE.to_string(),
            metric_name: require_str(&format!("{field}.metric_name"), &rule.metric_name)?.to_string(),
            entity_type: require_str(&format!("{field}.entity_type"), &rule.entity_type)?.to_string(),
            aggregation: rule.aggregation.clone(),
            cross_series_aggregation: rule.cross_series_aggregation.clone(),
            regex: rule.regex,
        },
        thresholds: severity_thresholds_to_api(&format!("{field}.threshold"), &rule.threshold)?,
    })
}

fn generic_rule_from_api(rule: &RuleWithThreshold<InfraAlertRule>) -> Result<GenericRuleState> {
    if rule.rule.alert_type != ALERT_TYPE_GENERIC_RULE {
        return Err(Error::malformed(format!(
            "unsupported infrastructure alert rule type '{}'",
            rule.rule.alert_type
        )));
    }
    Ok(GenericRuleState {
        metric_name: rule.rule.metric_name.clone(),
        entity_type: rule.rule.entity_type.clone(),
        aggregation: rule.rule.aggregation.clone(),
        cross_series_aggregation: rule.rule.cross_series_aggregation.clone(),
        regex: rule.rule.regex,
        threshold_operator: rule.threshold_operator.clone(),
        threshold: severity_thresholds_from_api(&rule.thresholds),
    })
}

pub struct InfraAlertConfigResource {
    metadata: ResourceMetadata,
}

impl InfraAlertConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 0),
        }
    }
}

impl Default for InfraAlertConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for InfraAlertConfigResource {
    type State = InfraAlertConfigState;
    type Api = InfraAlertConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<InfraAlertConfig>> {
        api.infra_alert_configs()
    }

    fn map_state_to_api(&self, state: &InfraAlertConfigState) -> Result<InfraAlertConfig> {
        let generic_rule = require("rules.generic_rule", state.rules.generic_rule.as_ref())?;
        let time_threshold = state
            .time_threshold
            .as_ref()
            .and_then(|t| t.violations_in_sequence.as_ref())
            .map(|t| {
                require("time_threshold.violations_in_sequence.time_window", t.time_window)
                    .map(|time_window| InfraTimeThreshold::ViolationsInSequence { time_window })
            })
            .transpose()?;
        let evaluation_type = state.evaluation_type.as_deref().unwrap_or(DEFAULT_EVALUATION_TYPE);

        Ok(InfraAlertConfig {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            description: state.description.clone(),
            tag_filter_expression: tag_filter_to_api("tag_filter", state.tag_filter.as_deref())?,
            group_by: state.group_by.clone(),
            granularity: state.granularity.unwrap_or(DEFAULT_GRANULARITY),
            time_threshold,
            rules: vec![generic_rule_to_api(generic_rule)?],
            alert_channels: state
                .alert_channels
                .as_ref()
                .map(AlertChannelsState::to_api)
                .unwrap_or_default(),
            evaluation_type: validate_value("evaluation_type", evaluation_type, INFRA_ALERT_EVALUATION_TYPES)?
                .to_string(),
            custom_payload_fields: custom_payload_fields_to_api(state.custom_payload_field.as_ref())?,
        })
    }

    fn update_state(
        &self,
        config: &InfraAlertConfig,
        _previous: Option<&InfraAlertConfigState>,
    ) -> Result<InfraAlertConfigState> {
        let generic_rule = config.rules.first().map(generic_rule_from_api).transpose()?;
        Ok(InfraAlertConfigState {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            tag_filter: tag_filter_from_api(config.tag_filter_expression.as_ref())?,
            group_by: config.group_by.clone(),
            granularity: Some(config.granularity),
            evaluation_type: Some(config.evaluation_type.clone()),
            alert_channels: AlertChannelsState::from_api(&config.alert_channels),
            rules: RulesState { generic_rule },
            time_threshold: config.time_threshold.as_ref().map(|t| match t {
                InfraTimeThreshold::ViolationsInSequence { time_window } => TimeThresholdState {
                    violations_in_sequence: Some(ViolationsInSequenceState {
                        time_window: Some(*time_window),
                    }),
                },
            }),
            custom_payload_field: custom_payload_fields_from_api(&config.custom_payload_fields),
        })
    }
}
