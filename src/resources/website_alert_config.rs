//! `instana_website_alert_config`

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{
    custom_payload_fields_from_api, custom_payload_fields_to_api, require, require_str,
    set_to_vec, severity_from_api, severity_to_api, tag_filter_from_api, tag_filter_to_api,
    threshold_from_api, threshold_to_api, validate_value, vec_to_set, CustomPayloadFieldState,
    OneOf, ThresholdState,
};
use crate::restapi::website_alert_config::{
    WebsiteAlertRule, WebsiteTimeThreshold, WEBSITE_IMPACT_MEASUREMENT_METHODS,
};
use crate::restapi::{InstanaApi, RestResource, WebsiteAlertConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_website_alert_config";

const DEFAULT_GRANULARITY: i64 = 600_000;

const ALERT_TYPE_SLOWNESS: &str = "slowness";
const ALERT_TYPE_SPECIFIC_JS_ERROR: &str = "specificJsError";
const ALERT_TYPE_STATUS_CODE: &str = "statusCode";
const ALERT_TYPE_THROUGHPUT: &str = "throughput";

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteAlertConfigState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Option<String>,
    pub triggering: bool,
    pub website_id: String,
    pub tag_filter: Option<String>,
    pub alert_channel_ids: BTreeSet<String>,
    pub granularity: Option<i64>,
    pub rule: RuleBlocks,
    pub threshold: ThresholdState,
    pub time_threshold: TimeThresholdState,
    pub custom_payload_field: Option<Vec<CustomPayloadFieldState>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleBlocks {
    pub slowness: Option<MetricRuleState>,
    pub specific_js_error: Option<ComparisonRuleState>,
    pub status_code: Option<ComparisonRuleState>,
    pub throughput: Option<MetricRuleState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricRuleState {
    pub metric_name: Option<String>,
    pub aggregation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonRuleState {
    pub metric_name: Option<String>,
    pub aggregation: Option<String>,
    pub operator: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeThresholdState {
    pub violations_in_sequence: Option<ViolationsInSequenceState>,
    pub violations_in_period: Option<ViolationsInPeriodState>,
    pub user_impact_of_violations_in_sequence: Option<UserImpactState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationsInSequenceState {
    pub time_window: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationsInPeriodState {
    pub time_window: Option<i64>,
    pub violations: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserImpactState {
    pub time_window: Option<i64>,
    pub impact_measurement_method: Option<String>,
    pub user_percentage: Option<f64>,
    pub users: Option<i32>,
}

state_with_id!(WebsiteAlertConfigState);

// ============================================================================
// Mapping
// ============================================================================

fn metric_rule(field: &str, alert_type: &str, rule: &MetricRuleState) -> Result<WebsiteAlertRule> {
    Ok(WebsiteAlertRule {
        alert_type: alert_type.to_string(),
        metric_name: require(&format!("{field}.metric_name"), rule.metric_name.clone())?,
        aggregation: rule.aggregation.clone(),
        ..Default::default()
    })
}

fn comparison_rule(field: &str, alert_type: &str, rule: &ComparisonRuleState) -> Result<WebsiteAlertRule> {
    Ok(WebsiteAlertRule {
        alert_type: alert_type.to_string(),
        metric_name: require(&format!("{field}.metric_name"), rule.metric_name.clone())?,
        aggregation: rule.aggregation.clone(),
        operator: rule.operator.clone(),
        value: rule.value.clone(),
    })
}

fn rule_to_api(blocks: &RuleBlocks) -> Result<WebsiteAlertRule> {
    OneOf::new("rule")
        .variant("slowness", blocks.slowness.as_ref(), |r| {
            metric_rule("rule.slowness", ALERT_TYPE_SLOWNESS, r)
        })
        .variant("specific_js_error", blocks.specific_js_error.as_ref(), |r| {
            comparison_rule("rule.specific_js_error", ALERT_TYPE_SPECIFIC_JS_ERROR, r)
        })
        .variant("status_code", blocks.status_code.as_ref(), |r| {
            comparison_rule("rule.status_code", ALERT_TYPE_STATUS_CODE, r)
        })
        .variant("throughput", blocks.throughput.as_ref(), |r| {
            metric_rule("rule.throughput", ALERT_TYPE_THROUGHPUT, r)
        })
        .required()
}

fn rule_from_api(rule: &WebsiteAlertRule) -> Result<RuleBlocks> {
    let metric = || MetricRuleState {
        metric_name: Some(rule.metric_name.clone()),
        aggregation: rule.aggregation.clone(),
    };
    let comparison = || ComparisonRuleState {
        metric_name: Some(rule.metric_name.clone()),
        aggregation: rule.aggregation.clone(),
        operator: rule.operator.clone(),
        value: rule.value.clone(),
    };
    let mut blocks = RuleBlocks::default();
    match rule.alert_type.as_str() {
        ALERT_TYPE_SLOWNESS => blocks.slowness = Some(metric()),
        ALERT_TYPE_THROUGHPUT => blocks.throughput = Some(metric()),
        ALERT_TYPE_SPECIFIC_JS_ERROR => blocks.specific_js_error = Some(comparison()),
        ALERT_TYPE_STATUS_CODE => blocks.status_code = Some(comparison()),
        other => {
            return Err(Error::malformed(format!(
                "unsupported website alert rule type '{other}'"
            )))
        }
    }
    Ok(blocks)
}

fn time_threshold_to_api(state: &TimeThresholdState) -> Result<WebsiteTimeThreshold> {
    OneOf::new("time_threshold")
        .variant("violations_in_sequence", state.violations_in_sequence.as_ref(), |t| {
            Ok(WebsiteTimeThreshold::ViolationsInSequence {
                time_window: require(
                    "time_threshold.violations_in_sequence.time_window",
                    t.time_window,
                )?,
            })
        })
        .variant("violations_in_period", state.violations_in_period.as_ref(), |t| {
            Ok(WebsiteTimeThreshold::ViolationsInPeriod {
                time_window: require("time_threshold.violations_in_period.time_window", t.time_window)?,
                violations: require("time_threshold.violations_in_period.violations", t.violations)?,
            })
        })
        .variant(
            "user_impact_of_violations_in_sequence",
            state.user_impact_of_violations_in_sequence.as_ref(),
            |t| {
                let field = "time_threshold.user_impact_of_violations_in_sequence";
                let method = require(
                    &format!("{field}.impact_measurement_method"),
                    t.impact_measurement_method.as_deref(),
                )?;
                Ok(WebsiteTimeThreshold::UserImpactOfViolationsInSequence {
                    time_window: require(&format!("{field}.time_window"), t.time_window)?,
                    impact_measurement_method: validate_value(
                        &format!("{field}.impact_measurement_method"),
                        method,
                        WEBSITE_IMPACT_MEASUREMENT_METHODS,
                    )?
                    .to_string(),
                    user_percentage: t.user_percentage,
                    users: t.users,
                })
            },
        )
        .required()
}

fn time_threshold_from_api(threshold: &WebsiteTimeThreshold) -> TimeThresholdState {
    let mut state = TimeThresholdState::default();
    match threshold {
        WebsiteTimeThreshold::ViolationsInSequence { time_window } => {
            state.violations_in_sequence = Some(ViolationsInSequenceState {
                time_window: Some(*time_window),
            })
        }
        WebsiteTimeThreshold::ViolationsInPeriod {
            time_window,
            violations,
        } => {
            state.violations_in_period = Some(ViolationsInPeriodState {
                time_window: Some(*time_window),
                violations: Some(*violations),
            })
        }
        WebsiteTimeThreshold::UserImpactOfViolationsInSequence {
            time_window,
            impact_measurement_method,
            user_percentage,
            users,
        } => {
            state.user_impact_of_violations_in_sequence = Some(UserImpactState {
                time_window: Some(*time_window),
                impact_measurement_method: Some(impact_measurement_method.clone()),
                user_percentage: *user_percentage,
                users: *users,
            })
        }
    }
    state
}

// ============================================================================
// Handle
// ============================================================================

pub struct WebsiteAlertConfigResource {
    metadata: ResourceMetadata,
}

impl WebsiteAlertConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 1),
        }
    }
}

impl Default for WebsiteAlertConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for WebsiteAlertConfigResource {
    type State = WebsiteAlertConfigState;
    type Api = WebsiteAlertConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<WebsiteAlertConfig>> {
        api.website_alert_configs()
    }

    fn map_state_to_api(&self, state: &WebsiteAlertConfigState) -> Result<WebsiteAlertConfig> {
        Ok(WebsiteAlertConfig {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            description: state.description.clone(),
            severity: state
                .severity
                .as_deref()
                .map(|s| severity_to_api("severity", s))
                .transpose()?,
            triggering: state.triggering,
            website_id: require_str("website_id", &state.website_id)?.to_string(),
            tag_filter_expression: tag_filter_to_api("tag_filter", state.tag_filter.as_deref())?,
            alert_channel_ids: set_to_vec(&state.alert_channel_ids),
            granularity: state.granularity.unwrap_or(DEFAULT_GRANULARITY),
            rule: rule_to_api(&state.rule)?,
            threshold: threshold_to_api("threshold", &state.threshold)?,
            time_threshold: time_threshold_to_api(&state.time_threshold)?,
            custom_payload_fields: custom_payload_fields_to_api(state.custom_payload_field.as_ref())?,
        })
    }

    fn update_state(
        &self,
        config: &WebsiteAlertConfig,
        _previous: Option<&WebsiteAlertConfigState>,
    ) -> Result<WebsiteAlertConfigState> {
        Ok(WebsiteAlertConfigState {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            severity: config.severity.map(severity_from_api).transpose()?,
            triggering: config.triggering,
            website_id: config.website_id.clone(),
            tag_filter: tag_filter_from_api(config.tag_filter_expression.as_ref())?,
            alert_channel_ids: vec_to_set(&config.alert_channel_ids),
            granularity: Some(config.granularity),
            rule: rule_from_api(&config.rule)?,
            threshold: threshold_from_api(&config.threshold),
            time_threshold: time_threshold_from_api(&config.time_threshold),
            custom_payload_field: custom_payload_fields_from_api(&config.custom_payload_fields),
        })
    }
}
