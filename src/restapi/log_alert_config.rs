//! Log smart alerts

use super::object::{custom_payload_fields_aware, data_object_with_id};
use super::tag_filter::TagFilter;
use super::threshold::RuleWithThreshold;
use crate::codec::CustomPayloadField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Evaluation windows accepted for log alerts, in milliseconds
pub const LOG_ALERT_GRANULARITIES: &[i64] = &[60_000, 300_000, 600_000, 900_000, 1_200_000, 1_800_000];

/// Wire alert type of a log count rule
pub const LOG_ALERT_TYPE_LOG_COUNT: &str = "logCount";

pub const LOG_ALERT_AGGREGATION_SUM: &str = "SUM";

/// Log smart alert
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAlertConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag_filter_expression: Option<TagFilter>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alert_channels: BTreeMap<String, Vec<String>>,
    pub granularity: i64,
    #[serde(default)]
    pub time_threshold: Option<LogTimeThreshold>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period: Option<i64>,
    #[serde(default)]
    pub rules: Vec<RuleWithThreshold<LogAlertRule>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<GroupByTag>,
    #[serde(skip)]
    pub custom_payload_fields: Vec<CustomPayloadField>,
}

/// Rule of a log alert
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAlertRule {
    pub alert_type: String,
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
}

/// Time threshold of a log alert, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LogTimeThreshold {
    #[serde(rename = "violationsInSequence", rename_all = "camelCase")]
    ViolationsInSequence { time_window: i64 },
}

/// Tag the metric results are grouped by
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupByTag {
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

data_object_with_id!(LogAlertConfig);
custom_payload_fields_aware!(LogAlertConfig);
