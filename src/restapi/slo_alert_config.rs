//! SLO alerts

use super::object::{custom_payload_fields_aware, data_object_with_id};
use crate::codec::CustomPayloadField;
use serde::{Deserialize, Serialize};

pub const SLO_ALERT_TYPE_SERVICE_LEVELS_OBJECTIVE: &str = "SERVICE_LEVELS_OBJECTIVE";
pub const SLO_ALERT_TYPE_ERROR_BUDGET: &str = "ERROR_BUDGET";
pub const SLO_METRIC_STATUS: &str = "STATUS";
pub const SLO_METRIC_BURNED_PERCENTAGE: &str = "BURNED_PERCENTAGE";
pub const SLO_METRIC_BURN_RATE_V2: &str = "BURN_RATE_V2";

/// Alert on SLO status, error budget or burn rate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloAlertConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: i32,
    #[serde(default)]
    pub triggering: bool,
    #[serde(default)]
    pub enabled: bool,
    pub rule: SloAlertRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<SloAlertThreshold>,
    pub time_threshold: SloAlertTimeThreshold,
    #[serde(default)]
    pub slo_ids: Vec<String>,
    #[serde(default)]
    pub alert_channel_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub burn_rate_configs: Vec<BurnRateConfig>,
    #[serde(skip)]
    pub custom_payload_fields: Vec<CustomPayloadField>,
}

/// Alert type and metric pair
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloAlertRule {
    pub alert_type: String,
    pub metric: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloAlertThreshold {
    #[serde(rename = "type")]
    pub kind: String,
    pub operator: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloAlertTimeThreshold {
    pub time_window: i64,
    pub expiry: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnRateConfig {
    pub alert_window_type: String,
    pub duration: String,
    pub duration_unit_type: String,
    pub threshold: BurnRateThreshold,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnRateThreshold {
    pub operator: String,
    pub value: f64,
}

data_object_with_id!(SloAlertConfig);
custom_payload_fields_aware!(SloAlertConfig);
