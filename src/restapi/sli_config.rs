//! Service level indicators

use super::object::data_object_with_id;
use super::tag_filter::TagFilter;
use serde::{Deserialize, Serialize};

/// SLI definition; the API offers no update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliConfig {
    pub id: String,
    #[serde(rename = "sliName")]
    pub name: String,
    #[serde(default)]
    pub initial_evaluation_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_configuration: Option<MetricConfiguration>,
    pub sli_entity: SliEntity,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricConfiguration {
    pub metric_name: String,
    #[serde(rename = "metricAggregation")]
    pub aggregation: String,
    pub threshold: f64,
}

/// Entity an SLI is computed on, discriminated by `sliType`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliEntity {
    pub sli_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_internal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_synthetic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beacon_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_event_filter_expression: Option<TagFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_event_filter_expression: Option<TagFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<TagFilter>,
}

pub const SLI_TYPE_APPLICATION: &str = "application";
pub const SLI_TYPE_AVAILABILITY: &str = "availability";
pub const SLI_TYPE_WEBSITE_EVENT_BASED: &str = "websiteEventBased";
pub const SLI_TYPE_WEBSITE_TIME_BASED: &str = "websiteTimeBased";

data_object_with_id!(SliConfig);
