//! `instana_custom_event_specification`
//!
//! Rules are grouped by kind in state. At most one of the single-rule kinds
//! may be set; `threshold` holds any number of threshold rules.

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{
    require, require_str, severity_from_api, severity_to_api, tag_filter_from_api,
    tag_filter_to_api, validate_value, OneOf,
};
use crate::restapi::event_specification::{
    MetricPattern, RuleSpecification, LOGICAL_OPERATORS, RULE_TYPE_ENTITY_COUNT,
    RULE_TYPE_ENTITY_COUNT_VERIFICATION, RULE_TYPE_ENTITY_VERIFICATION,
    RULE_TYPE_HOST_AVAILABILITY, RULE_TYPE_SYSTEM, RULE_TYPE_THRESHOLD,
};
use crate::restapi::{CustomEventSpecification, InstanaApi, RestResource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_custom_event_specification";

const CONDITION_OPERATORS: &[&str] = &["=", "!=", ">", ">=", "<", "<="];
const MATCHING_OPERATORS: &[&str] = &["is", "contains", "startsWith", "endsWith"];
const METRIC_PATTERN_OPERATORS: &[&str] = &["is", "contains", "any", "startsWith", "endsWith"];

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomEventSpecificationState {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub query: Option<String>,
    pub triggering: bool,
    pub description: Option<String>,
    pub expiration_time: Option<i64>,
    pub enabled: Option<bool>,
    pub rule_logical_operator: Option<String>,
    pub rules: RulesState,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesState {
    pub entity_count: Option<EntityCountRuleState>,
    pub entity_count_verification: Option<EntityCountVerificationRuleState>,
    pub entity_verification: Option<EntityVerificationRuleState>,
    pub host_availability: Option<HostAvailabilityRuleState>,
    pub system: Option<SystemRuleState>,
    pub threshold: Option<Vec<ThresholdRuleState>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityCountRuleState {
    pub severity: Option<String>,
    pub condition_operator: Option<String>,
    pub condition_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityCountVerificationRuleState {
    pub severity: Option<String>,
    pub condition_operator: Option<String>,
    pub condition_value: Option<f64>,
    pub matching_entity_type: Option<String>,
    pub matching_operator: Option<String>,
    pub matching_entity_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityVerificationRuleState {
    pub severity: Option<String>,
    pub matching_entity_type: Option<String>,
    pub matching_operator: Option<String>,
    pub matching_entity_label: Option<String>,
    pub offline_duration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostAvailabilityRuleState {
    pub severity: Option<String>,
    pub offline_duration: Option<i64>,
    pub close_after: Option<i64>,
    pub tag_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemRuleState {
    pub severity: Option<String>,
    pub system_rule_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdRuleState {
    pub severity: String,
    pub metric_name: Option<String>,
    pub metric_pattern: Option<MetricPatternState>,
    pub rollup: Option<i64>,
    pub window: Option<i64>,
    pub aggregation: Option<String>,
    pub condition_operator: String,
    pub condition_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricPatternState {
    pub prefix: String,
    pub postfix: Option<String>,
    pub placeholder: Option<String>,
    pub operator: String,
}

state_with_id!(CustomEventSpecificationState);

// ============================================================================
// Rules
// ============================================================================

fn severity(field: &str, value: Option<&String>) -> Result<i32> {
    severity_to_api(&format!("{field}.severity"), require(&format!("{field}.severity"), value)?)
}

fn condition_operator(field: &str, value: &str) -> Result<Option<String>> {
    validate_value(&format!("{field}.condition_operator"), value, CONDITION_OPERATORS)
        .map(|op| Some(op.to_string()))
}

fn matching_operator(field: &str, value: Option<&String>) -> Result<Option<String>> {
    value
        .map(|op| {
            validate_value(&format!("{field}.matching_operator"), op, MATCHING_OPERATORS)
                .map(str::to_string)
        })
        .transpose()
}

fn single_rule_to_api(rules: &RulesState) -> Result<Option<RuleSpecification>> {
    OneOf::new("rules")
        .variant("entity_count", rules.entity_count.as_ref(), |r| {
            let field = "rules.entity_count";
            Ok(RuleSpecification {
                condition_operator: condition_operator(
                    field,
                    require(&format!("{field}.condition_operator"), r.condition_operator.as_deref())?,
                )?,
                condition_value: Some(require(&format!("{field}.condition_value"), r.condition_value)?),
                ..RuleSpecification::new(RULE_TYPE_ENTITY_COUNT, severity(field, r.severity.as_ref())?)
            })
        })
        .variant("entity_count_verification", rules.entity_count_verification.as_ref(), |r| {
            let field = "rules.entity_count_verification";
            Ok(RuleSpecification {
                condition_operator: condition_operator(
                    field,
                    require(&format!("{field}.condition_operator"), r.condition_operator.as_deref())?,
                )?,
                condition_value: Some(require(&format!("{field}.condition_value"), r.condition_value)?),
                matching_entity_type: Some(require(
                    &format!("{field}.matching_entity_type"),
                    r.matching_entity_type.clone(),
                )?),
                matching_operator: matching_operator(field, r.matching_operator.as_ref())?,
                matching_entity_label: r.matching_entity_label.clone(),
                ..RuleSpecification::new(
                    RULE_TYPE_ENTITY_COUNT_VERIFICATION,
                    severity(field, r.severity.as_ref())?,
                )
            })
        })
        .variant("entity_verification", rules.entity_verification.as_ref(), |r| {
            let field = "rules.entity_verification";
            Ok(RuleSpecification {
                matching_entity_type: Some(require(
                    &format!("{field}.matching_entity_type"),
                    r.matching_entity_type.clone(),
                )?),
                matching_operator: matching_operator(field, r.matching_operator.as_ref())?,
                matching_entity_label: r.matching_entity_label.clone(),
                offline_duration: Some(require(&format!("{field}.offline_duration"), r.offline_duration)?),
                ..RuleSpecification::new(
                    RULE_TYPE_ENTITY_VERIFICATION,
                    severity(field, r.severity.as_ref())?,
                )
            })
        })
        .variant("host_availability", rules.host_availability.as_ref(), |r| {
            let field = "rules.host_availability";
            Ok(RuleSpecification {
                offline_duration: Some(require(&format!("{field}.offline_duration"), r.offline_duration)?),
                close_after: r.close_after,
                tag_filter: tag_filter_to_api(&format!("{field}.tag_filter"), r.tag_filter.as_deref())?,
                ..RuleSpecification::new(
                    RULE_TYPE_HOST_AVAILABILITY,
                    severity(field, r.severity.as_ref())?,
                )
            })
        })
        .variant("system", rules.system.as_ref(), |r| {
            let field = "rules.system";
            Ok(RuleSpecification {
                system_rule_id: Some(require(&format!("{field}.system_rule_id"), r.system_rule_id.clone())?),
                ..RuleSpecification::new(RULE_TYPE_SYSTEM, severity(field, r.severity.as_ref())?)
            })
        })
        .optional()
}

fn threshold_rule_to_api(i: usize, rule: &ThresholdRuleState) -> Result<RuleSpecification> {
    let field = format!("rules.threshold[{i}]");
    if rule.metric_name.is_some() == rule.metric_pattern.is_some() {
        return Err(Error::invalid_configuration(
            field,
            "exactly one of metric_name, metric_pattern must be set",
        ));
    }
    let metric_pattern = rule
        .metric_pattern
        .as_ref()
        .map(|p| {
            Ok::<_, Error>(MetricPattern {
                prefix: require_str(&format!("{field}.metric_pattern.prefix"), &p.prefix)?.to_string(),
                postfix: p.postfix.clone(),
                placeholder: p.placeholder.clone(),
                operator: validate_value(
                    &format!("{field}.metric_pattern.operator"),
                    &p.operator,
                    METRIC_PATTERN_OPERATORS,
                )?
                .to_string(),
            })
        })
        .transpose()?;
    Ok(RuleSpecification {
        metric_name: rule.metric_name.clone(),
        metric_pattern,
        rollup: rule.rollup,
        window: rule.window,
        aggregation: rule.aggregation.clone(),
        condition_operator: condition_operator(&field, &rule.condition_operator)?,
        condition_value: rule.condition_value,
        ..RuleSpecification::new(
            RULE_TYPE_THRESHOLD,
            severity_to_api(&format!("{field}.severity"), &rule.severity)?,
        )
    })
}

fn rules_to_api(rules: &RulesState) -> Result<Vec<RuleSpecification>> {
    let mut result: Vec<RuleSpecification> = single_rule_to_api(rules)?.into_iter().collect();
    for (i, rule) in rules.threshold.iter().flatten().enumerate() {
        result.push(threshold_rule_to_api(i, rule)?);
    }
    if result.is_empty() {
        return Err(Error::invalid_configuration("rules", "at least one rule must be set"));
    }
    Ok(result)
}

fn rules_from_api(rules: &[RuleSpecification]) -> Result<RulesState> {
    let mut state = RulesState::default();
    let mut thresholds = Vec::new();
    for rule in rules {
        let severity = Some(severity_from_api(rule.severity)?);
        match rule.rule_type.as_str() {
            RULE_TYPE_ENTITY_COUNT => {
                state.entity_count = Some(EntityCountRuleState {
                    severity,
                    condition_operator: rule.condition_operator.clone(),
                    condition_value: rule.condition_value,
                })
            }
            RULE_TYPE_ENTITY_COUNT_VERIFICATION => {
                state.entity_count_verification = Some(EntityCountVerificationRuleState {
                    severity,
                    condition_operator: rule.condition_operator.clone(),
                    condition_value: rule.condition_value,
                    matching_entity_type: rule.matching_entity_type.clone(),
                    matching_operator: rule.matching_operator.clone(),
                    matching_entity_label: rule.matching_entity_label.clone(),
                })
            }
            RULE_TYPE_ENTITY_VERIFICATION => {
                state.entity_verification = Some(EntityVerificationRuleState {
                    severity,
                    matching_entity_type: rule.matching_entity_type.clone(),
                    matching_operator: rule.matching_operator.clone(),
                    matching_entity_label: rule.matching_entity_label.clone(),
                    offline_duration: rule.offline_duration,
                })
            }
            RULE_TYPE_HOST_AVAILABILITY => {
                state.host_availability = Some(HostAvailabilityRuleState {
                    severity,
                    offline_duration: rule.offline_duration,
                    close_after: rule.close_after,
                    tag_filter: tag_filter_from_api(rule.tag_filter.as_ref())?,
                })
            }
            RULE_TYPE_SYSTEM => {
                state.system = Some(SystemRuleState {
                    severity,
                    system_rule_id: rule.system_rule_id.clone(),
                })
            }
            RULE_TYPE_THRESHOLD => thresholds.push(ThresholdRuleState {
                severity: severity_from_api(rule.severity)?,
                metric_name: rule.metric_name.clone(),
                metric_pattern: rule.metric_pattern.as_ref().map(|p| MetricPatternState {
                    prefix: p.prefix.clone(),
                    postfix: p.postfix.clone(),
                    placeholder: p.placeholder.clone(),
                    operator: p.operator.clone(),
                }),
                rollup: rule.rollup,
                window: rule.window,
                aggregation: rule.aggregation.clone(),
                condition_operator: rule.condition_operator.clone().unwrap_or_default(),
                condition_value: rule.condition_value,
            }),
            other => {
                return Err(Error::malformed(format!("unsupported event rule type '{other}'")));
            }
        }
    }
    state.threshold = (!thresholds.is_empty()).then_some(thresholds);
    Ok(state)
}

// ============================================================================
// Handle
// ============================================================================

pub struct CustomEventSpecificationResource {
    metadata: ResourceMetadata,
}

impl CustomEventSpecificationResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 1),
        }
    }
}

impl Default for CustomEventSpecificationResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for CustomEventSpecificationResource {
    type State = CustomEventSpecificationState;
    type Api = CustomEventSpecification;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<CustomEventSpecification>> {
        api.custom_event_specifications()
    }

    fn map_state_to_api(&self, state: &CustomEventSpecificationState) -> Result<CustomEventSpecification> {
        let logical_operator = state.rule_logical_operator.as_deref().unwrap_or("AND");
        Ok(CustomEventSpecification {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            entity_type: require_str("entity_type", &state.entity_type)?.to_string(),
            query: state.query.clone().filter(|q| !q.is_empty()),
            triggering: state.triggering,
            description: state.description.clone(),
            expiration_time: state.expiration_time,
            enabled: state.enabled.unwrap_or(true),
            rule_logical_operator: validate_value(
                "rule_logical_operator",
                logical_operator,
                LOGICAL_OPERATORS,
            )?
            .to_string(),
            rules: rules_to_api(&state.rules)?,
        })
    }

    fn update_state(
        &self,
        spec: &CustomEventSpecification,
        _previous: Option<&CustomEventSpecificationState>,
    ) -> Result<CustomEventSpecificationState> {
        Ok(CustomEventSpecificationState {
            id: spec.id.clone(),
            name: spec.name.clone(),
            entity_type: spec.entity_type.clone(),
            query: spec.query.clone(),
            triggering: spec.triggering,
            description: spec.description.clone(),
            expiration_time: spec.expiration_time,
            enabled: Some(spec.enabled),
            rule_logical_operator: Some(spec.rule_logical_operator.clone()),
            rules: rules_from_api(&spec.rules)?,
        })
    }
}
