//! Application perspectives

use super::object::data_object_with_id;
use super::tag_filter::TagFilter;
use serde::{Deserialize, Serialize};

pub const APPLICATION_CONFIG_SCOPES: &[&str] = &[
    "INCLUDE_NO_DOWNSTREAM",
    "INCLUDE_IMMEDIATE_DOWNSTREAM_DATABASE_AND_MESSAGING",
    "INCLUDE_ALL_DOWNSTREAM",
];

pub const BOUNDARY_SCOPES: &[&str] = &["ALL", "INBOUND", "DEFAULT"];

pub const ACCESS_TYPES: &[&str] = &["READ", "READ_WRITE"];

pub const RELATION_TYPES: &[&str] = &["USER", "API_TOKEN", "ROLE", "TEAM", "GLOBAL"];

/// Application perspective definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationConfig {
    pub id: String,
    pub label: String,
    pub scope: String,
    pub boundary_scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter_expression: Option<TagFilter>,
    #[serde(default)]
    pub access_rules: Vec<AccessRule>,
}

/// Grant of access to an entity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    pub access_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    pub relation_type: String,
}

data_object_with_id!(ApplicationConfig);
