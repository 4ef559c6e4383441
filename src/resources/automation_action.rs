//! `instana_automation_action`
//!
//! The action is one of `script`, `http`, `manual` or `doc_link`. Each block
//! is flattened into the named `fields` of the wire document.

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{require_str, set_to_vec, vec_to_set, OneOf};
use crate::restapi::automation::{
    ActionField, ActionParameter, ACTION_TYPE_DOC_LINK, ACTION_TYPE_HTTP, ACTION_TYPE_MANUAL,
    ACTION_TYPE_SCRIPT, ENCODING_ASCII, ENCODING_BASE64, FIELD_BODY, FIELD_CONTENT, FIELD_HEADERS,
    FIELD_HOST, FIELD_IGNORE_CERT_ERRORS, FIELD_METHOD, FIELD_SCRIPT, FIELD_SUBTYPE,
    FIELD_TIMEOUT, FIELD_URL,
};
use crate::restapi::{AutomationAction, InstanaApi, RestResource};
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_automation_action";

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationActionState {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: BTreeSet<String>,
    pub input_parameter: Vec<InputParameterState>,
    pub script: Option<ScriptState>,
    pub http: Option<HttpState>,
    pub manual: Option<ContentState>,
    pub doc_link: Option<DocLinkState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParameterState {
    pub name: String,
    pub label: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub required: bool,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptState {
    pub content: Option<String>,
    pub interpreter: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpState {
    pub host: Option<String>,
    pub method: Option<String>,
    pub body: Option<String>,
    pub headers: Option<StringMap>,
    pub ignore_certificate_errors: Option<bool>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentState {
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocLinkState {
    pub url: Option<String>,
}

state_with_id!(AutomationActionState);

fn required_field(field: &str, value: Option<&String>) -> Result<String> {
    let value = value.ok_or_else(|| Error::invalid_configuration(field, "attribute is required"))?;
    Ok(require_str(field, value)?.to_string())
}

fn fields_to_api(state: &AutomationActionState) -> Result<(&'static str, Vec<ActionField>)> {
    OneOf::new("action")
        .variant("script", state.script.as_ref(), |b| {
            let mut fields = vec![ActionField::new(
                FIELD_SCRIPT,
                "script",
                required_field("script.content", b.content.as_ref())?,
                ENCODING_BASE64,
            )];
            if let Some(interpreter) = b.interpreter.as_ref() {
                fields.push(ActionField::new(FIELD_SUBTYPE, "interpreter", interpreter, ENCODING_ASCII));
            }
            if let Some(timeout) = b.timeout.as_ref() {
                fields.push(ActionField::new(FIELD_TIMEOUT, "timeout", timeout, ENCODING_ASCII));
            }
            Ok((ACTION_TYPE_SCRIPT, fields))
        })
        .variant("http", state.http.as_ref(), |b| {
            let method = required_field("http.method", b.method.as_ref())?.to_ascii_uppercase();
            if !HTTP_METHODS.contains(&method.as_str()) {
                return Err(Error::invalid_configuration(
                    "http.method",
                    format!("'{method}' is not one of {}", HTTP_METHODS.join(", ")),
                ));
            }
            let mut fields = vec![
                ActionField::new(
                    FIELD_HOST,
                    "host",
                    required_field("http.host", b.host.as_ref())?,
                    ENCODING_ASCII,
                ),
                ActionField::new(FIELD_METHOD, "method", method, ENCODING_ASCII),
                ActionField::new(
                    FIELD_IGNORE_CERT_ERRORS,
                    "ignore certificate errors",
                    b.ignore_certificate_errors.unwrap_or(false).to_string(),
                    ENCODING_ASCII,
                ),
            ];
            if let Some(body) = b.body.as_ref() {
                fields.push(ActionField::new(FIELD_BODY, "body", body, ENCODING_ASCII));
            }
            if let Some(headers) = b.headers.as_ref().filter(|h| !h.is_empty()) {
                fields.push(ActionField::new(
                    FIELD_HEADERS,
                    "headers",
                    serde_json::to_string(headers)?,
                    ENCODING_ASCII,
                ));
            }
            if let Some(timeout) = b.timeout.as_ref() {
                fields.push(ActionField::new(FIELD_TIMEOUT, "timeout", timeout, ENCODING_ASCII));
            }
            Ok((ACTION_TYPE_HTTP, fields))
        })
        .variant("manual", state.manual.as_ref(), |b| {
            Ok((
                ACTION_TYPE_MANUAL,
                vec![ActionField::new(
                    FIELD_CONTENT,
                    "content",
                    required_field("manual.content", b.content.as_ref())?,
                    ENCODING_ASCII,
                )],
            ))
        })
        .variant("doc_link", state.doc_link.as_ref(), |b| {
            Ok((
                ACTION_TYPE_DOC_LINK,
                vec![ActionField::new(
                    FIELD_URL,
                    "url",
                    required_field("doc_link.url", b.url.as_ref())?,
                    ENCODING_ASCII,
                )],
            ))
        })
        .required()
}

fn fields_from_api(action: &AutomationAction, state: &mut AutomationActionState) -> Result<()> {
    let field = |name: &str| action.field(name).map(str::to_string);
    match action.kind.as_str() {
        ACTION_TYPE_SCRIPT => {
            state.script = Some(ScriptState {
                content: field(FIELD_SCRIPT),
                interpreter: field(FIELD_SUBTYPE),
                timeout: field(FIELD_TIMEOUT),
            })
        }
        ACTION_TYPE_HTTP => {
            let headers = action
                .field(FIELD_HEADERS)
                .filter(|h| !h.is_empty())
                .map(serde_json::from_str::<StringMap>)
                .transpose()?;
            state.http = Some(HttpState {
                host: field(FIELD_HOST),
                method: field(FIELD_METHOD),
                body: field(FIELD_BODY),
                headers,
                ignore_certificate_errors: action
                    .field(FIELD_IGNORE_CERT_ERRORS)
                    .map(|v| v.eq_ignore_ascii_case("true")),
                timeout: field(FIELD_TIMEOUT),
            })
        }
        ACTION_TYPE_MANUAL => {
            state.manual = Some(ContentState {
                content: field(FIELD_CONTENT),
            })
        }
        ACTION_TYPE_DOC_LINK => {
            state.doc_link = Some(DocLinkState {
                url: field(FIELD_URL),
            })
        }
        other => {
            return Err(Error::malformed(format!(
                "unsupported automation action type '{other}'"
            )))
        }
    }
    Ok(())
}

pub struct AutomationActionResource {
    metadata: ResourceMetadata,
}

impl AutomationActionResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 0),
        }
    }
}

impl Default for AutomationActionResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for AutomationActionResource {
    type State = AutomationActionState;
    type Api = AutomationAction;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<AutomationAction>> {
        api.automation_actions()
    }

    fn map_state_to_api(&self, state: &AutomationActionState) -> Result<AutomationAction> {
        let (kind, fields) = fields_to_api(state)?;
        Ok(AutomationAction {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            description: state.description.clone(),
            kind: kind.to_string(),
            tags: set_to_vec(&state.tags),
            fields,
            input_parameters: state
                .input_parameter
                .iter()
                .map(|p| ActionParameter {
                    name: p.name.clone(),
                    label: p.label.clone(),
                    description: p.description.clone(),
                    kind: p.kind.clone(),
                    value: p.value.clone(),
                    required: p.required,
                    hidden: p.hidden,
                    secured: p.kind == "vault",
                })
                .collect(),
        })
    }

    fn update_state(
        &self,
        action: &AutomationAction,
        _previous: Option<&AutomationActionState>,
    ) -> Result<AutomationActionState> {
        let mut state = AutomationActionState {
            id: action.id.clone(),
            name: action.name.clone(),
            description: action.description.clone(),
            tags: vec_to_set(&action.tags),
            input_parameter: action
                .input_parameters
                .iter()
                .map(|p| InputParameterState {
                    name: p.name.clone(),
                    label: p.label.clone(),
                    description: p.description.clone(),
                    kind: p.kind.clone(),
                    value: p.value.clone(),
                    required: p.required,
                    hidden: p.hidden,
                })
                .collect(),
            ..Default::default()
        };
        fields_from_api(action, &mut state)?;
        Ok(state)
    }
}
