//! Automation actions and policies

use super::object::data_object_with_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ACTION_TYPE_SCRIPT: &str = "SCRIPT";
pub const ACTION_TYPE_HTTP: &str = "HTTP";
pub const ACTION_TYPE_MANUAL: &str = "MANUAL";
pub const ACTION_TYPE_DOC_LINK: &str = "DOC_LINK";

pub const FIELD_SCRIPT: &str = "script_ssh";
pub const FIELD_SUBTYPE: &str = "subtype";
pub const FIELD_TIMEOUT: &str = "timeout";
pub const FIELD_HOST: &str = "host";
pub const FIELD_METHOD: &str = "method";
pub const FIELD_BODY: &str = "body";
pub const FIELD_HEADERS: &str = "headers";
pub const FIELD_IGNORE_CERT_ERRORS: &str = "ignoreCertErrors";
pub const FIELD_CONTENT: &str = "content";
pub const FIELD_URL: &str = "url";

pub const ENCODING_ASCII: &str = "ascii";
pub const ENCODING_BASE64: &str = "base64";

/// Runnable automation action; its configuration travels as named fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationAction {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub fields: Vec<ActionField>,
    #[serde(default)]
    pub input_parameters: Vec<ActionParameter>,
}

impl AutomationAction {
    /// Value of the named field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionField {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub value: String,
    #[serde(default)]
    pub encoding: String,
    #[serde(default)]
    pub secured: bool,
}

impl ActionField {
    pub fn new(name: &str, description: &str, value: impl Into<String>, encoding: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            value: value.into(),
            encoding: encoding.to_string(),
            secured: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParameter {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub secured: bool,
}

/// Policy that runs actions when a trigger fires
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationPolicy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Either a list of strings or null
    #[serde(default)]
    pub tags: Value,
    pub trigger: Trigger,
    #[serde(default)]
    pub type_configurations: Vec<TypeConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeConfiguration {
    pub name: String,
    #[serde(default)]
    pub condition: Option<Condition>,
    pub runnable: Runnable,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runnable {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub run_configuration: RunConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunConfiguration {
    #[serde(default)]
    pub actions: Vec<ActionConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfiguration {
    pub action: ActionRef,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub input_parameter_values: Vec<InputParameterValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputParameterValue {
    pub name: String,
    pub value: String,
}

data_object_with_id!(AutomationAction, AutomationPolicy);
