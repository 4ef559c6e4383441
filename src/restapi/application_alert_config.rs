//! Application smart alerts
//!
//! The same shape is used for application-scoped and global application
//! alert configs; only the collection path differs.

use super::object::{custom_payload_fields_aware, data_object_with_id};
use super::tag_filter::TagFilter;
use super::threshold::RuleWithThreshold;
use crate::codec::CustomPayloadField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const APPLICATION_ALERT_EVALUATION_TYPES: &[&str] =
    &["PER_AP", "PER_AP_SERVICE", "PER_AP_ENDPOINT"];

/// Application smart alert
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationAlertConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<i32>,
    #[serde(default)]
    pub triggering: bool,
    #[serde(default)]
    pub applications: BTreeMap<String, IncludedApplication>,
    pub boundary_scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter_expression: Option<TagFilter>,
    #[serde(default)]
    pub include_internal: bool,
    #[serde(default)]
    pub include_synthetic: bool,
    pub evaluation_type: String,
    #[serde(default)]
    pub alert_channels: BTreeMap<String, Vec<String>>,
    pub granularity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period: Option<i64>,
    #[serde(default)]
    pub rules: Vec<RuleWithThreshold<ApplicationAlertRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_threshold: Option<ApplicationAlertTimeThreshold>,
    #[serde(skip)]
    pub custom_payload_fields: Vec<CustomPayloadField>,
}

/// Application included in the alert scope
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedApplication {
    pub application_id: String,
    pub inclusive: bool,
    #[serde(default)]
    pub services: BTreeMap<String, IncludedService>,
}

/// Service included in the alert scope
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedService {
    pub service_id: String,
    pub inclusive: bool,
    #[serde(default)]
    pub endpoints: BTreeMap<String, IncludedEndpoint>,
}

/// Endpoint included in the alert scope
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedEndpoint {
    pub endpoint_id: String,
    pub inclusive: bool,
}

/// Rule of an application alert, discriminated by `alertType`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationAlertRule {
    pub alert_type: String,
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code_start: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code_end: Option<i32>,
}

/// Time threshold of an application alert, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ApplicationAlertTimeThreshold {
    #[serde(rename = "requestImpact", rename_all = "camelCase")]
    RequestImpact { time_window: i64, requests: i32 },
    #[serde(rename = "violationsInPeriod", rename_all = "camelCase")]
    ViolationsInPeriod { time_window: i64, violations: i32 },
    #[serde(rename = "violationsInSequence", rename_all = "camelCase")]
    ViolationsInSequence { time_window: i64 },
}

data_object_with_id!(ApplicationAlertConfig);
custom_payload_fields_aware!(ApplicationAlertConfig);
