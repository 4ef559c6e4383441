//! Service level objectives

use super::object::data_object_with_id;
use super::tag_filter::TagFilter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SLO_ENTITY_APPLICATION: &str = "application";
pub const SLO_ENTITY_WEBSITE: &str = "website";
pub const SLO_ENTITY_SYNTHETIC: &str = "synthetic";
pub const SLO_ENTITY_INFRASTRUCTURE: &str = "infrastructure";

pub const SLO_BLUEPRINT_LATENCY: &str = "latency";
pub const SLO_BLUEPRINT_AVAILABILITY: &str = "availability";
pub const SLO_BLUEPRINT_TRAFFIC: &str = "traffic";
pub const SLO_BLUEPRINT_CUSTOM: &str = "custom";

pub const SLO_MEASUREMENT_TIME_BASED: &str = "timeBased";
pub const SLO_MEASUREMENT_EVENT_BASED: &str = "eventBased";

pub const SLO_TIME_WINDOW_ROLLING: &str = "rolling";
pub const SLO_TIME_WINDOW_FIXED: &str = "fixed";

/// SLO definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloConfig {
    pub id: String,
    pub name: String,
    pub target: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub entity: SloEntity,
    pub indicator: SloIndicator,
    pub time_window: SloTimeWindow,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rbac_tags: Vec<RbacTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RbacTag {
    pub display_name: String,
    pub id: String,
}

/// Entity the objective is measured on, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloEntity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_synthetic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_internal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter_expression: Option<TagFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beacon_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthetic_test_ids: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_type: Option<String>,
}

/// Indicator, discriminated by `blueprint` and measurement `type`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloIndicator {
    pub blueprint: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_type: Option<String>,
    #[serde(rename = "goodEventsFilter", default, skip_serializing_if = "Option::is_none")]
    pub good_events_filter: Option<TagFilter>,
    #[serde(rename = "badEventsFilter", default, skip_serializing_if = "Option::is_none")]
    pub bad_events_filter: Option<TagFilter>,
}

/// Time window, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloTimeWindow {
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: i64,
    pub duration_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(
        rename = "startTimestamp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub start_timestamp: Option<f64>,
}

data_object_with_id!(SloConfig);
