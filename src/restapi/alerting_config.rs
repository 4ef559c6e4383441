//! Legacy alerting configurations
//!
//! Routes events selected by rule ids or event types to a set of alerting
//! channels (integrations).

use super::object::{custom_payload_fields_aware, data_object_with_id};
use crate::codec::CustomPayloadField;
use serde::{Deserialize, Serialize};

/// Event types an alerting configuration can subscribe to, lower-case
pub const ALERT_EVENT_TYPES: &[&str] = &[
    "incident",
    "critical",
    "warning",
    "change",
    "online",
    "offline",
    "none",
    "agent_monitoring_issue",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertingConfiguration {
    pub id: String,
    pub alert_name: String,
    #[serde(default)]
    pub integration_ids: Vec<String>,
    #[serde(default)]
    pub event_filtering_configuration: EventFilteringConfiguration,
    #[serde(skip)]
    pub custom_payload_fields: Vec<CustomPayloadField>,
}

/// Selects the events an alerting configuration forwards
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilteringConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_types: Vec<String>,
}

data_object_with_id!(AlertingConfiguration);
custom_payload_fields_aware!(AlertingConfiguration);
