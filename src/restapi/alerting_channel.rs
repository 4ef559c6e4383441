//! Alerting channels
//!
//! All channel kinds share one flat document; `kind` selects which of the
//! optional fields are meaningful.

use super::object::data_object_with_id;
use serde::{Deserialize, Serialize};

pub const KIND_EMAIL: &str = "EMAIL";
pub const KIND_OPS_GENIE: &str = "OPS_GENIE";
pub const KIND_PAGER_DUTY: &str = "PAGER_DUTY";
pub const KIND_SLACK: &str = "SLACK";
pub const KIND_SPLUNK: &str = "SPLUNK";
pub const KIND_VICTOR_OPS: &str = "VICTOR_OPS";
pub const KIND_WEBHOOK: &str = "WEB_HOOK";
pub const KIND_OFFICE_365: &str = "OFFICE_365";
pub const KIND_GOOGLE_CHAT: &str = "GOOGLE_CHAT";
pub const KIND_PROMETHEUS_WEBHOOK: &str = "PROMETHEUS_WEBHOOK";
pub const KIND_WEBEX_TEAMS_WEBHOOK: &str = "WEBEX_TEAMS_WEBHOOK";

pub const OPS_GENIE_REGIONS: &[&str] = &["EU", "US"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertingChannel {
    pub id: String,
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Comma separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_integration_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_urls: Option<Vec<String>>,
    /// Entries of the form `name: value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

impl AlertingChannel {
    /// Channel of the given kind with no kind-specific fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.to_string(),
            ..Self::default()
        }
    }
}

data_object_with_id!(AlertingChannel);
