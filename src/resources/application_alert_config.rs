//! `instana_application_alert_config` and `instana_global_application_alert_config`
//!
//! Both resources share the state schema and entity; only the collection
//! differs.

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{
    custom_payload_fields_from_api, custom_payload_fields_to_api, require_str,
    severity_from_api, severity_thresholds_from_api, severity_thresholds_to_api,
    severity_to_api, tag_filter_from_api, tag_filter_to_api, validate_value, AlertChannelsState,
    CustomPayloadFieldState, OneOf, SeverityThresholdsState, THRESHOLD_OPERATORS,
};
use crate::restapi::application_alert_config::{
    ApplicationAlertRule, ApplicationAlertTimeThreshold, IncludedApplication, IncludedEndpoint,
    IncludedService, APPLICATION_ALERT_EVALUATION_TYPES,
};
use crate::restapi::application_config::BOUNDARY_SCOPES;
use crate::restapi::{ApplicationAlertConfig, InstanaApi, RestResource, RuleWithThreshold};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_application_alert_config";
pub const GLOBAL_RESOURCE_NAME: &str = "instana_global_application_alert_config";

const DEFAULT_GRANULARITY: i64 = 600_000;
const DEFAULT_EVALUATION_TYPE: &str = "PER_AP";
const DEFAULT_BOUNDARY_SCOPE: &str = "INBOUND";

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationAlertConfigState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Option<String>,
    pub triggering: bool,
    pub include_internal: bool,
    pub include_synthetic: bool,
    pub boundary_scope: Option<String>,
    pub evaluation_type: Option<String>,
    pub granularity: Option<i64>,
    pub grace_period: Option<i64>,
    pub tag_filter: Option<String>,
    pub alert_channels: Option<AlertChannelsState>,
    pub application: Vec<ApplicationState>,
    pub rules: Vec<RuleState>,
    pub time_threshold: Option<TimeThresholdState>,
    pub custom_payload_field: Option<Vec<CustomPayloadFieldState>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationState {
    pub application_id: String,
    pub inclusive: bool,
    pub service: Vec<ServiceState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceState {
    pub service_id: String,
    pub inclusive: bool,
    pub endpoint: Vec<EndpointState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointState {
    pub endpoint_id: String,
    pub inclusive: bool,
}

/// One rule with its threshold operator and severity-keyed thresholds
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleState {
    pub threshold_operator: String,
    pub rule: RuleBlocks,
    pub threshold: SeverityThresholdsState,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleBlocks {
    pub error_rate: Option<MetricRuleState>,
    pub errors: Option<MetricRuleState>,
    pub logs: Option<LogsRuleState>,
    pub slowness: Option<MetricRuleState>,
    pub status_code: Option<StatusCodeRuleState>,
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
pub struct LogsRuleState {
    pub metric_name: Option<String>,
    pub aggregation: Option<String>,
    pub level: Option<String>,
    pub message: Option<String>,
    pub operator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCodeRuleState {
    pub metric_name: Option<String>,
    pub aggregation: Option<String>,
    pub status_code_start: Option<i32>,
    pub status_code_end: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeThresholdState {
    pub request_impact: Option<RequestImpactState>,
    pub violations_in_period: Option<ViolationsInPeriodState>,
    pub violations_in_sequence: Option<ViolationsInSequenceState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestImpactState {
    pub time_window: Option<i64>,
    pub requests: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationsInPeriodState {
    pub time_window: Option<i64>,
    pub violations: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationsInSequenceState {
    pub time_window: Option<i64>,
}

state_with_id!(ApplicationAlertConfigState);

// ============================================================================
// Rules
// ============================================================================

const ALERT_TYPE_ERROR_RATE: &str = "errorRate";
const ALERT_TYPE_ERRORS: &str = "errors";
const ALERT_TYPE_LOGS: &str = "logs";
const ALERT_TYPE_SLOWNESS: &str = "slowness";
const ALERT_TYPE_STATUS_CODE: &str = "statusCode";
const ALERT_TYPE_THROUGHPUT: &str = "throughput";

fn metric_name(field: &str, metric_name: &Option<String>) -> Result<String> {
    metric_name
        .clone()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| Error::invalid_configuration(format!("{field}.metric_name"), "attribute is required"))
}

fn metric_rule(field: &str, alert_type: &str, rule: &MetricRuleState) -> Result<ApplicationAlertRule> {
    Ok(ApplicationAlertRule {
        alert_type: alert_type.to_string(),
        metric_name: metric_name(field, &rule.metric_name)?,
        aggregation: rule.aggregation.clone(),
        ..Default::default()
    })
}

fn rule_to_api(field: &str, blocks: &RuleBlocks) -> Result<ApplicationAlertRule> {
    OneOf::new(field)
        .variant("error_rate", blocks.error_rate.as_ref(), |r| {
            metric_rule(&format!("{field}.error_rate"), ALERT_TYPE_ERROR_RATE, r)
        })
        .variant("errors", blocks.errors.as_ref(), |r| {
            metric_rule(&format!("{field}.errors"), ALERT_TYPE_ERRORS, r)
        })
        .variant("logs", blocks.logs.as_ref(), |r| {
            Ok(ApplicationAlertRule {
                alert_type: ALERT_TYPE_LOGS.to_string(),
                metric_name: metric_name(&format!("{field}.logs"), &r.metric_name)?,
                aggregation: r.aggregation.clone(),
                level: r.level.clone(),
                message: r.message.clone(),
                operator: r.operator.clone(),
                ..Default::default()
            })
        })
        .variant("slowness", blocks.slowness.as_ref(), |r| {
            metric_rule(&format!("{field}.slowness"), ALERT_TYPE_SLOWNESS, r)
        })
        .variant("status_code", blocks.status_code.as_ref(), |r| {
            Ok(ApplicationAlertRule {
                alert_type: ALERT_TYPE_STATUS_CODE.to_string(),
                metric_name: metric_name(&format!("{field}.status_code"), &r.metric_name)?,
                aggregation: r.aggregation.clone(),
                status_code_start: r.status_code_start,
                status_code_end: r.status_code_end,
                ..Default::default()
            })
        })
        .variant("throughput", blocks.throughput.as_ref(), |r| {
            metric_rule(&format!("{field}.throughput"), ALERT_TYPE_THROUGHPUT, r)
        })
        .required()
}

fn rule_from_api(rule: &ApplicationAlertRule) -> Result<RuleBlocks> {
    let metric = || MetricRuleState {
        metric_name: Some(rule.metric_name.clone()),
        aggregation: rule.aggregation.clone(),
    };
    let mut blocks = RuleBlocks::default();
    match rule.alert_type.as_str() {
        ALERT_TYPE_ERROR_RATE => blocks.error_rate = Some(metric()),
        ALERT_TYPE_ERRORS => blocks.errors = Some(metric()),
        ALERT_TYPE_SLOWNESS => blocks.slowness = Some(metric()),
        ALERT_TYPE_THROUGHPUT => blocks.throughput = Some(metric()),
        ALERT_TYPE_LOGS => {
            blocks.logs = Some(LogsRuleState {
                metric_name: Some(rule.metric_name.clone()),
                aggregation: rule.aggregation.clone(),
                level: rule.level.clone(),
                message: rule.message.clone(),
                operator: rule.operator.clone(),
            })
        }
        ALERT_TYPE_STATUS_CODE => {
            blocks.status_code = Some(StatusCodeRuleState {
                metric_name: Some(rule.metric_name.clone()),
                aggregation: rule.aggregation.clone(),
                status_code_start: rule.status_code_start,
                status_code_end: rule.status_code_end,
            })
        }
        other => {
            return Err(Error::malformed(format!(
                "unsupported application alert rule type '{other}'"
            )))
        }
    }
    Ok(blocks)
}

// ============================================================================
// Time Threshold
// ============================================================================

fn time_window(field: &str, value: Option<i64>) -> Result<i64> {
    value.ok_or_else(|| Error::invalid_configuration(format!("{field}.time_window"), "attribute is required"))
}

fn time_threshold_to_api(
    state: Option<&TimeThresholdState>,
) -> Result<Option<ApplicationAlertTimeThreshold>> {
    let Some(state) = state else {
        return Ok(None);
    };
    OneOf::new("time_threshold")
        .variant("request_impact", state.request_impact.as_ref(), |t| {
            Ok(ApplicationAlertTimeThreshold::RequestImpact {
                time_window: time_window("time_threshold.request_impact", t.time_window)?,
                requests: t.requests.unwrap_or_default(),
            })
        })
        .variant("violations_in_period", state.violations_in_period.as_ref(), |t| {
            Ok(ApplicationAlertTimeThreshold::ViolationsInPeriod {
                time_window: time_window("time_threshold.violations_in_period", t.time_window)?,
                violations: t.violations.unwrap_or_default(),
            })
        })
        .variant("violations_in_sequence", state.violations_in_sequence.as_ref(), |t| {
            Ok(ApplicationAlertTimeThreshold::ViolationsInSequence {
                time_window: time_window("time_threshold.violations_in_sequence", t.time_window)?,
            })
        })
        .optional()
}

fn time_threshold_from_api(threshold: &ApplicationAlertTimeThreshold) -> TimeThresholdState {
    let mut state = TimeThresholdState::default();
    match threshold {
        ApplicationAlertTimeThreshold::RequestImpact {
            time_window,
            requests,
        } => {
            state.request_impact = Some(RequestImpactState {
                time_window: Some(*time_window),
                requests: Some(*requests),
            })
        }
        ApplicationAlertTimeThreshold::ViolationsInPeriod {
            time_window,
            violations,
        } => {
            state.violations_in_period = Some(ViolationsInPeriodState {
                time_window: Some(*time_window),
                violations: Some(*violations),
            })
        }
        ApplicationAlertTimeThreshold::ViolationsInSequence { time_window } => {
            state.violations_in_sequence = Some(ViolationsInSequenceState {
                time_window: Some(*time_window),
            })
        }
    }
    state
}

// ============================================================================
// Applications
// ============================================================================

fn applications_to_api(applications: &[ApplicationState]) -> Result<BTreeMap<String, IncludedApplication>> {
    let mut result = BTreeMap::new();
    for (i, application) in applications.iter().enumerate() {
        let field = format!("application[{i}]");
        let application_id = require_str(&format!("{field}.application_id"), &application.application_id)?;
        let services = application
            .service
            .iter()
            .map(|service| {
                let endpoints = service
                    .endpoint
                    .iter()
                    .map(|endpoint| {
                        (
                            endpoint.endpoint_id.clone(),
                            IncludedEndpoint {
                                endpoint_id: endpoint.endpoint_id.clone(),
                                inclusive: endpoint.inclusive,
                            },
                        )
                    })
                    .collect();
                (
                    service.service_id.clone(),
                    IncludedService {
                        service_id: service.service_id.clone(),
                        inclusive: service.inclusive,
                        endpoints,
                    },
                )
            })
            .collect();
        result.insert(
            application_id.to_string(),
            IncludedApplication {
                application_id: application_id.to_string(),
                inclusive: application.inclusive,
                services,
            },
        );
    }
    Ok(result)
}

fn applications_from_api(applications: &BTreeMap<String, IncludedApplication>) -> Vec<ApplicationState> {
    applications
        .values()
        .map(|application| ApplicationState {
            application_id: application.application_id.clone(),
            inclusive: application.inclusive,
            service: application
                .services
                .values()
                .map(|service| ServiceState {
                    service_id: service.service_id.clone(),
                    inclusive: service.inclusive,
                    endpoint: service
                        .endpoints
                        .values()
                        .map(|endpoint| EndpointState {
                            endpoint_id: endpoint.endpoint_id.clone(),
                            inclusive: endpoint.inclusive,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

// ============================================================================
// Handle
// ============================================================================

pub struct ApplicationAlertConfigResource {
    metadata: ResourceMetadata,
    global: bool,
}

impl ApplicationAlertConfigResource {
    /// Application-scoped alert configs
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 1),
            global: false,
        }
    }

    /// Global application alert configs
    pub fn global() -> Self {
        Self {
            metadata: ResourceMetadata::new(GLOBAL_RESOURCE_NAME, 1),
            global: true,
        }
    }
}

impl Default for ApplicationAlertConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for ApplicationAlertConfigResource {
    type State = ApplicationAlertConfigState;
    type Api = ApplicationAlertConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<ApplicationAlertConfig>> {
        if self.global {
            api.global_application_alert_configs()
        } else {
            api.application_alert_configs()
        }
    }

    fn map_state_to_api(&self, state: &ApplicationAlertConfigState) -> Result<ApplicationAlertConfig> {
        let rules = state
            .rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                let field = format!("rules[{i}]");
                Ok(RuleWithThreshold {
                    threshold_operator: validate_value(
                        &format!("{field}.threshold_operator"),
                        &rule.threshold_operator,
                        THRESHOLD_OPERATORS,
                    )?
                    .to_string(),
                    rule: rule_to_api(&format!("{field}.rule"), &rule.rule)?,
                    thresholds: severity_thresholds_to_api(&format!("{field}.threshold"), &rule.threshold)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if rules.is_empty() {
            return Err(Error::invalid_configuration("rules", "at least one rule is required"));
        }

        let boundary_scope = state.boundary_scope.as_deref().unwrap_or(DEFAULT_BOUNDARY_SCOPE);
        let evaluation_type = state.evaluation_type.as_deref().unwrap_or(DEFAULT_EVALUATION_TYPE);
        Ok(ApplicationAlertConfig {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            description: state.description.clone(),
            severity: state
                .severity
                .as_deref()
                .map(|s| severity_to_api("severity", s))
                .transpose()?,
            triggering: state.triggering,
            applications: applications_to_api(&state.application)?,
            boundary_scope: validate_value("boundary_scope", boundary_scope, BOUNDARY_SCOPES)?.to_string(),
            tag_filter_expression: tag_filter_to_api("tag_filter", state.tag_filter.as_deref())?,
            include_internal: state.include_internal,
            include_synthetic: state.include_synthetic,
            evaluation_type: validate_value(
                "evaluation_type",
                evaluation_type,
                APPLICATION_ALERT_EVALUATION_TYPES,
            )?
            .to_string(),
            alert_channels: state
                .alert_channels
                .as_ref()
                .map(AlertChannelsState::to_api_named)
                .unwrap_or_default(),
            granularity: state.granularity.unwrap_or(DEFAULT_GRANULARITY),
            grace_period: state.grace_period,
            rules,
            time_threshold: time_threshold_to_api(state.time_threshold.as_ref())?,
            custom_payload_fields: custom_payload_fields_to_api(state.custom_payload_field.as_ref())?,
        })
    }

    fn update_state(
        &self,
        config: &ApplicationAlertConfig,
        _previous: Option<&ApplicationAlertConfigState>,
    ) -> Result<ApplicationAlertConfigState> {
        let rules = config
            .rules
            .iter()
            .map(|rule| {
                Ok(RuleState {
                    threshold_operator: rule.threshold_operator.clone(),
                    rule: rule_from_api(&rule.rule)?,
                    threshold: severity_thresholds_from_api(&rule.thresholds),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ApplicationAlertConfigState {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            severity: config.severity.map(severity_from_api).transpose()?,
            triggering: config.triggering,
            include_internal: config.include_internal,
            include_synthetic: config.include_synthetic,
            boundary_scope: Some(config.boundary_scope.clone()),
            evaluation_type: Some(config.evaluation_type.clone()),
            granularity: Some(config.granularity),
            grace_period: config.grace_period,
            tag_filter: tag_filter_from_api(config.tag_filter_expression.as_ref())?,
            alert_channels: AlertChannelsState::from_api_named(&config.alert_channels),
            application: applications_from_api(&config.applications),
            rules,
            time_threshold: config.time_threshold.as_ref().map(time_threshold_from_api),
            custom_payload_field: custom_payload_fields_from_api(&config.custom_payload_fields),
        })
    }
}
