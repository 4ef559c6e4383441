//! `instana_log_alert_config`
//!
//! Log alerts carry a single log count rule. Its thresholds must be static.

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{
    custom_payload_fields_from_api, custom_payload_fields_to_api, require, require_str,
    severity_thresholds_from_api, severity_thresholds_to_api, tag_filter_from_api,
    tag_filter_to_api, validate_value, AlertChannelsState, CustomPayloadFieldState, OneOf,
    SeverityThresholdsState, THRESHOLD_OPERATORS,
};
use crate::restapi::log_alert_config::{
    GroupByTag, LogAlertRule, LogTimeThreshold, LOG_ALERT_AGGREGATION_SUM,
    LOG_ALERT_GRANULARITIES, LOG_ALERT_TYPE_LOG_COUNT,
};
use crate::restapi::{
    InstanaApi, LogAlertConfig, RestResource, RuleWithThreshold, SeverityThresholds, Threshold,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_log_alert_config";

/// State spelling of the log count alert type
pub const ALERT_TYPE_LOG_COUNT: &str = "log.count";

const DEFAULT_GRANULARITY: i64 = 600_000;

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogAlertConfigState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tag_filter: Option<String>,
    pub granularity: Option<i64>,
    pub grace_period: Option<i64>,
    pub alert_channels: Option<AlertChannelsState>,
    pub group_by: Vec<GroupByState>,
    pub rules: Option<LogRuleState>,
    pub time_threshold: Option<TimeThresholdState>,
    pub custom_payload_field: Option<Vec<CustomPayloadFieldState>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupByState {
    pub tag_name: String,
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogRuleState {
    pub metric_name: String,
    pub alert_type: Option<String>,
    pub aggregation: Option<String>,
    pub threshold_operator: String,
    pub threshold: Option<SeverityThresholdsState>,
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

state_with_id!(LogAlertConfigState);

// ============================================================================
// Mapping
// ============================================================================

fn granularity_to_api(value: Option<i64>) -> Result<i64> {
    let granularity = value.unwrap_or(DEFAULT_GRANULARITY);
    if !LOG_ALERT_GRANULARITIES.contains(&granularity) {
        return Err(Error::invalid_configuration(
            "granularity",
            format!("{granularity} is not a supported evaluation window"),
        ));
    }
    Ok(granularity)
}

fn static_thresholds_only(field: &str, thresholds: SeverityThresholds) -> Result<SeverityThresholds> {
    if let Some((severity, _)) = thresholds
        .iter()
        .find(|(_, t)| !matches!(t, Threshold::Static { .. }))
    {
        return Err(Error::invalid_configuration(
            format!("{field}.{}", severity.as_str()),
            "log alerts support static thresholds only",
        ));
    }
    Ok(thresholds)
}

fn rule_to_api(rule: &LogRuleState) -> Result<RuleWithThreshold<LogAlertRule>> {
    validate_value(
        "rules.alert_type",
        rule.alert_type.as_deref().unwrap_or(ALERT_TYPE_LOG_COUNT),
        &[ALERT_TYPE_LOG_COUNT],
    )?;
    let aggregation = rule
        .aggregation
        .as_deref()
        .map(|a| validate_value("rules.aggregation", a, &[LOG_ALERT_AGGREGATION_SUM]))
        .transpose()?;
    let thresholds = match rule.threshold.as_ref() {
        Some(threshold) => static_thresholds_only(
            "rules.threshold",
            severity_thresholds_to_api("rules.threshold", threshold)?,
        )?,
        None => SeverityThresholds::new(),
    };

    Ok(RuleWithThreshold {
        threshold_operator: validate_value(
            "rules.threshold_operator",
            &rule.threshold_operator,
            THRESHOLD_OPERATORS,
        )?
        .to_string(),
        rule: LogAlertRule {
            alert_type: LOG_ALERT_TYPE_LOG_COUNT.to_string(),
            metric_name: require_str("rules.metric_name", &rule.metric_name)?.to_string(),
            aggregation: aggregation.map(str::to_string),
        },
        thresholds,
    })
}

fn rule_from_api(rule: &RuleWithThreshold<LogAlertRule>) -> LogRuleState {
    let alert_type = if rule.rule.alert_type == LOG_ALERT_TYPE_LOG_COUNT {
        ALERT_TYPE_LOG_COUNT.to_string()
    } else {
        rule.rule.alert_type.clone()
    };
    LogRuleState {
        metric_name: rule.rule.metric_name.clone(),
        alert_type: Some(alert_type),
        aggregation: Some(
            rule.rule
                .aggregation
                .clone()
                .unwrap_or_else(|| LOG_ALERT_AGGREGATION_SUM.to_string()),
        ),
        threshold_operator: rule.threshold_operator.clone(),
        threshold: (!rule.thresholds.is_empty()).then(|| severity_thresholds_from_api(&rule.thresholds)),
    }
}

fn time_threshold_to_api(state: Option<&TimeThresholdState>) -> Result<Option<LogTimeThreshold>> {
    let Some(state) = state else {
        return Ok(None);
    };
    OneOf::new("time_threshold")
        .variant("violations_in_sequence", state.violations_in_sequence.as_ref(), |t| {
            Ok(LogTimeThreshold::ViolationsInSequence {
                time_window: require(
                    "time_threshold.violations_in_sequence.time_window",
                    t.time_window,
                )?,
            })
        })
        .optional()
}

fn time_threshold_from_api(threshold: &LogTimeThreshold) -> TimeThresholdState {
    match threshold {
        LogTimeThreshold::ViolationsInSequence { time_window } => TimeThresholdState {
            violations_in_sequence: Some(ViolationsInSequenceState {
                time_window: Some(*time_window),
            }),
        },
    }
}

fn group_by_to_api(group_by: &[GroupByState]) -> Result<Vec<GroupByTag>> {
    group_by
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Ok(GroupByTag {
                tag_name: require_str(&format!("group_by[{i}].tag_name"), &g.tag_name)?.to_string(),
                key: g.key.clone().filter(|k| !k.is_empty()),
            })
        })
        .collect()
}

// ============================================================================
// Handle
// ============================================================================

pub struct LogAlertConfigResource {
    metadata: ResourceMetadata,
}

impl LogAlertConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 1),
        }
    }
}

impl Default for LogAlertConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for LogAlertConfigResource {
    type State = LogAlertConfigState;
    type Api = LogAlertConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<LogAlertConfig>> {
        api.log_alert_configs()
    }

    fn map_state_to_api(&self, state: &LogAlertConfigState) -> Result<LogAlertConfig> {
        let tag_filter = require("tag_filter", state.tag_filter.as_deref())?;
        Ok(LogAlertConfig {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            description: state.description.clone(),
            tag_filter_expression: tag_filter_to_api("tag_filter", Some(tag_filter))?,
            alert_channels: state
                .alert_channels
                .as_ref()
                .map(AlertChannelsState::to_api_named)
                .unwrap_or_default(),
            granularity: granularity_to_api(state.granularity)?,
            time_threshold: time_threshold_to_api(state.time_threshold.as_ref())?,
            grace_period: state.grace_period,
            rules: state.rules.as_ref().map(rule_to_api).transpose()?.into_iter().collect(),
            group_by: group_by_to_api(&state.group_by)?,
            custom_payload_fields: custom_payload_fields_to_api(state.custom_payload_field.as_ref())?,
        })
    }

    fn update_state(
        &self,
        config: &LogAlertConfig,
        _previous: Option<&LogAlertConfigState>,
    ) -> Result<LogAlertConfigState> {
        if config.rules.len() > 1 {
            return Err(Error::malformed(format!(
                "log alert config '{}' carries {} rules, expected at most one",
                config.id,
                config.rules.len()
            )));
        }
        Ok(LogAlertConfigState {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            tag_filter: tag_filter_from_api(config.tag_filter_expression.as_ref())?,
            granularity: Some(config.granularity),
            grace_period: config.grace_period,
            alert_channels: AlertChannelsState::from_api_named(&config.alert_channels),
            group_by: config
                .group_by
                .iter()
                .map(|g| GroupByState {
                    tag_name: g.tag_name.clone(),
                    key: g.key.clone(),
                })
                .collect(),
            rules: config.rules.first().map(rule_from_api),
            time_threshold: config.time_threshold.as_ref().map(time_threshold_from_api),
            custom_payload_field: custom_payload_fields_from_api(&config.custom_payload_fields),
        })
    }
}
