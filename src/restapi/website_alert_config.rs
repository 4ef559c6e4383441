//! Website smart alerts

use super::object::{custom_payload_fields_aware, data_object_with_id};
use super::tag_filter::TagFilter;
use super::threshold::Threshold;
use crate::codec::CustomPayloadField;
use serde::{Deserialize, Serialize};

pub const WEBSITE_IMPACT_MEASUREMENT_METHODS: &[&str] = &["AGGREGATED", "PER_WINDOW"];

/// Website smart alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteAlertConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<i32>,
    #[serde(default)]
    pub triggering: bool,
    pub website_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter_expression: Option<TagFilter>,
    #[serde(default)]
    pub alert_channel_ids: Vec<String>,
    pub granularity: i64,
    pub rule: WebsiteAlertRule,
    pub threshold: Threshold,
    pub time_threshold: WebsiteTimeThreshold,
    #[serde(skip)]
    pub custom_payload_fields: Vec<CustomPayloadField>,
}

/// Rule of a website alert, discriminated by `alertType`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteAlertRule {
    pub alert_type: String,
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Time threshold of a website alert, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WebsiteTimeThreshold {
    #[serde(rename = "violationsInSequence", rename_all = "camelCase")]
    ViolationsInSequence { time_window: i64 },
    #[serde(rename = "violationsInPeriod", rename_all = "camelCase")]
    ViolationsInPeriod { time_window: i64, violations: i32 },
    #[serde(rename = "userImpactOfViolationsInSequence", rename_all = "camelCase")]
    UserImpactOfViolationsInSequence {
        time_window: i64,
        impact_measurement_method: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_percentage: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        users: Option<i32>,
    },
}

data_object_with_id!(WebsiteAlertConfig);
custom_payload_fields_aware!(WebsiteAlertConfig);
