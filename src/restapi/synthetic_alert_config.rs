//! Synthetic smart alerts

use super::object::{custom_payload_fields_aware, data_object_with_id};
use super::tag_filter::TagFilter;
use crate::codec::CustomPayloadField;
use serde::{Deserialize, Serialize};

/// Synthetic test failure alert
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticAlertConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub synthetic_test_ids: Vec<String>,
    pub severity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter_expression: Option<TagFilter>,
    pub rule: SyntheticAlertRule,
    #[serde(default)]
    pub alert_channel_ids: Vec<String>,
    pub time_threshold: SyntheticAlertTimeThreshold,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period: Option<i64>,
    #[serde(skip)]
    pub custom_payload_fields: Vec<CustomPayloadField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticAlertRule {
    pub alert_type: String,
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticAlertTimeThreshold {
    #[serde(rename = "type")]
    pub kind: String,
    pub violations_count: i32,
}

data_object_with_id!(SyntheticAlertConfig);
custom_payload_fields_aware!(SyntheticAlertConfig);
