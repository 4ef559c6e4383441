//! SLO correction windows

use super::object::data_object_with_id;
use serde::{Deserialize, Serialize};

pub const DURATION_UNITS: &[&str] = &["MINUTE", "HOUR", "DAY"];

/// Window excluded from SLO evaluation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloCorrectionConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub active: bool,
    pub scheduling: Scheduling,
    #[serde(default)]
    pub slo_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheduling {
    /// Unix timestamp in milliseconds
    pub start_time: i64,
    pub duration: i64,
    pub duration_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrent_rule: Option<String>,
    #[serde(default)]
    pub recurrent: bool,
}

data_object_with_id!(SloCorrectionConfig);
