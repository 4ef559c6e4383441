//! Infrastructure smart alerts

use super::object::{custom_payload_fields_aware, data_object_with_id};
use super::tag_filter::TagFilter;
use super::threshold::RuleWithThreshold;
use crate::codec::CustomPayloadField;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const INFRA_ALERT_EVALUATION_TYPES: &[&str] = &["PER_ENTITY", "CUSTOM"];

/// Infrastructure smart alert
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfraAlertConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter_expression: Option<TagFilter>,
    #[serde(default)]
    pub group_by: Vec<String>,
    pub granularity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_threshold: Option<InfraTimeThreshold>,
    #[serde(default)]
    pub rules: Vec<RuleWithThreshold<InfraAlertRule>>,
    #[serde(default)]
    pub alert_channels: BTreeMap<Severity, Vec<String>>,
    pub evaluation_type: String,
    #[serde(skip)]
    pub custom_payload_fields: Vec<CustomPayloadField>,
}

/// Generic infrastructure metric rule
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfraAlertRule {
    pub alert_type: String,
    pub metric_name: String,
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_series_aggregation: Option<String>,
    #[serde(default)]
    pub regex: bool,
}

/// Time threshold of an infrastructure alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InfraTimeThreshold {
    #[serde(rename = "violationsInSequence", rename_all = "camelCase")]
    ViolationsInSequence { time_window: i64 },
}

data_object_with_id!(InfraAlertConfig);
custom_payload_fields_aware!(InfraAlertConfig);
