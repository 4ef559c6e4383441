//! Custom and built-in event specifications

use super::object::data_object_with_id;
use super::tag_filter::TagFilter;
use serde::{Deserialize, Serialize};

pub const RULE_TYPE_ENTITY_COUNT: &str = "entity_count";
pub const RULE_TYPE_ENTITY_COUNT_VERIFICATION: &str = "entity_count_verification";
pub const RULE_TYPE_ENTITY_VERIFICATION: &str = "entity_verification";
pub const RULE_TYPE_HOST_AVAILABILITY: &str = "host_availability";
pub const RULE_TYPE_SYSTEM: &str = "system";
pub const RULE_TYPE_THRESHOLD: &str = "threshold";

pub const LOGICAL_OPERATORS: &[&str] = &["AND", "OR"];

/// User-defined event specification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomEventSpecification {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default)]
    pub triggering: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_rule_logical_operator")]
    pub rule_logical_operator: String,
    #[serde(default)]
    pub rules: Vec<RuleSpecification>,
}

fn default_rule_logical_operator() -> String {
    "AND".to_string()
}

/// Rule of a custom event, discriminated by `ruleType`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpecification {
    pub rule_type: String,
    pub severity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_pattern: Option<MetricPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollup: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_after: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter: Option<TagFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_entity_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_rule_id: Option<String>,
}

impl RuleSpecification {
    /// Rule of the given type with no optional fields set
    pub fn new(rule_type: &str, severity: i32) -> Self {
        Self {
            rule_type: rule_type.to_string(),
            severity,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPattern {
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub operator: String,
}

/// Event specification shipped with Instana
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltinEventSpecification {
    pub id: String,
    pub short_plugin_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub severity: i32,
    #[serde(default)]
    pub triggering: bool,
    #[serde(default)]
    pub enabled: bool,
}

data_object_with_id!(CustomEventSpecification, BuiltinEventSpecification);
