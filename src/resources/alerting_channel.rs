//! `instana_alerting_channel`
//!
//! One block per channel kind; exactly one must be set.

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{require, require_str, set_to_vec, validate_value, vec_to_set, OneOf};
use crate::restapi::alerting_channel::{
    KIND_EMAIL, KIND_GOOGLE_CHAT, KIND_OFFICE_365, KIND_OPS_GENIE, KIND_PAGER_DUTY,
    KIND_PROMETHEUS_WEBHOOK, KIND_SLACK, KIND_SPLUNK, KIND_VICTOR_OPS, KIND_WEBEX_TEAMS_WEBHOOK,
    KIND_WEBHOOK, OPS_GENIE_REGIONS,
};
use crate::restapi::{AlertingChannel, InstanaApi, RestResource};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_alerting_channel";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertingChannelState {
    pub id: String,
    pub name: String,
    pub email: Option<EmailState>,
    pub ops_genie: Option<OpsGenieState>,
    pub pager_duty: Option<PagerDutyState>,
    pub slack: Option<SlackState>,
    pub splunk: Option<SplunkState>,
    pub victor_ops: Option<VictorOpsState>,
    pub webhook: Option<WebhookState>,
    pub office_365: Option<WebhookUrlState>,
    pub google_chat: Option<WebhookUrlState>,
    pub prometheus_webhook: Option<PrometheusWebhookState>,
    pub webex_teams_webhook: Option<WebhookUrlState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailState {
    pub emails: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpsGenieState {
    pub api_key: Option<String>,
    pub tags: Option<Vec<String>>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerDutyState {
    pub service_integration_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackState {
    pub webhook_url: Option<String>,
    pub icon_url: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SplunkState {
    pub url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VictorOpsState {
    pub api_key: Option<String>,
    pub routing_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookState {
    pub webhook_urls: Option<BTreeSet<String>>,
    pub http_headers: Option<BTreeMap<String, String>>,
}

/// Channel kinds configured by a single webhook URL
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookUrlState {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrometheusWebhookState {
    pub webhook_url: Option<String>,
    pub receiver: Option<String>,
}

state_with_id!(AlertingChannelState);

fn required(block: &str, attr: &str, value: Option<&String>) -> Result<String> {
    let path = format!("{block}.{attr}");
    let value = require(&path, value)?;
    Ok(require_str(&path, value)?.to_string())
}

fn headers_to_api(headers: &BTreeMap<String, String>) -> Vec<String> {
    headers.iter().map(|(k, v)| format!("{k}: {v}")).collect()
}

fn headers_from_api(headers: &[String]) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|h| {
            let (name, value) = h.split_once(':')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn webhook_url_channel(
    state: &AlertingChannelState,
    kind: &str,
    block: &str,
    value: &WebhookUrlState,
) -> Result<AlertingChannel> {
    Ok(AlertingChannel {
        webhook_url: Some(required(block, "webhook_url", value.webhook_url.as_ref())?),
        ..AlertingChannel::new(&state.id, &state.name, kind)
    })
}

pub struct AlertingChannelResource {
    metadata: ResourceMetadata,
}

impl AlertingChannelResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 1),
        }
    }
}

impl Default for AlertingChannelResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for AlertingChannelResource {
    type State = AlertingChannelState;
    type Api = AlertingChannel;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<AlertingChannel>> {
        api.alerting_channels()
    }

    fn map_state_to_api(&self, state: &AlertingChannelState) -> Result<AlertingChannel> {
        require_str("name", &state.name)?;
        let base = |kind: &str| AlertingChannel::new(&state.id, &state.name, kind);

        OneOf::new("channel")
            .variant("email", state.email.as_ref(), |b| {
                let emails = b.emails.as_ref().filter(|e| !e.is_empty()).ok_or_else(|| {
                    Error::invalid_configuration("email.emails", "at least one email is required")
                })?;
                Ok(AlertingChannel {
                    emails: Some(set_to_vec(emails)),
                    ..base(KIND_EMAIL)
                })
            })
            .variant("ops_genie", state.ops_genie.as_ref(), |b| {
                let region = required("ops_genie", "region", b.region.as_ref())?;
                Ok(AlertingChannel {
                    api_key: Some(required("ops_genie", "api_key", b.api_key.as_ref())?),
                    tags: Some(b.tags.as_deref().unwrap_or_default().join(",")),
                    region: Some(
                        validate_value("ops_genie.region", &region, OPS_GENIE_REGIONS)?.to_string(),
                    ),
                    ..base(KIND_OPS_GENIE)
                })
            })
            .variant("pager_duty", state.pager_duty.as_ref(), |b| {
                Ok(AlertingChannel {
                    service_integration_key: Some(required(
                        "pager_duty",
                        "service_integration_key",
                        b.service_integration_key.as_ref(),
                    )?),
                    ..base(KIND_PAGER_DUTY)
                })
            })
            .variant("slack", state.slack.as_ref(), |b| {
                Ok(AlertingChannel {
                    webhook_url: Some(required("slack", "webhook_url", b.webhook_url.as_ref())?),
                    icon_url: b.icon_url.clone(),
                    channel: b.channel.clone(),
                    ..base(KIND_SLACK)
                })
            })
            .variant("splunk", state.splunk.as_ref(), |b| {
                Ok(AlertingChannel {
                    url: Some(required("splunk", "url", b.url.as_ref())?),
                    token: Some(required("splunk", "token", b.token.as_ref())?),
                    ..base(KIND_SPLUNK)
                })
            })
            .variant("victor_ops", state.victor_ops.as_ref(), |b| {
                Ok(AlertingChannel {
                    api_key: Some(required("victor_ops", "api_key", b.api_key.as_ref())?),
                    routing_key: Some(required("victor_ops", "routing_key", b.routing_key.as_ref())?),
                    ..base(KIND_VICTOR_OPS)
                })
            })
            .variant("webhook", state.webhook.as_ref(), |b| {
                let urls = b.webhook_urls.as_ref().filter(|u| !u.is_empty()).ok_or_else(|| {
                    Error::invalid_configuration(
                        "webhook.webhook_urls",
                        "at least one webhook url is required",
                    )
                })?;
                Ok(AlertingChannel {
                    webhook_urls: Some(set_to_vec(urls)),
                    headers: b.http_headers.as_ref().map(headers_to_api),
                    ..base(KIND_WEBHOOK)
                })
            })
            .variant("office_365", state.office_365.as_ref(), |b| {
                webhook_url_channel(state, KIND_OFFICE_365, "office_365", b)
            })
            .variant("google_chat", state.google_chat.as_ref(), |b| {
                webhook_url_channel(state, KIND_GOOGLE_CHAT, "google_chat", b)
            })
            .variant("prometheus_webhook", state.prometheus_webhook.as_ref(), |b| {
                Ok(AlertingChannel {
                    webhook_url: Some(required(
                        "prometheus_webhook",
                        "webhook_url",
                        b.webhook_url.as_ref(),
                    )?),
                    receiver: b.receiver.clone(),
                    ..base(KIND_PROMETHEUS_WEBHOOK)
                })
            })
            .variant("webex_teams_webhook", state.webex_teams_webhook.as_ref(), |b| {
                webhook_url_channel(state, KIND_WEBEX_TEAMS_WEBHOOK, "webex_teams_webhook", b)
            })
            .required()
    }

    fn update_state(
        &self,
        channel: &AlertingChannel,
        _previous: Option<&AlertingChannelState>,
    ) -> Result<AlertingChannelState> {
        let mut state = AlertingChannelState {
            id: channel.id.clone(),
            name: channel.name.clone(),
            ..Default::default()
        };
        let webhook_url = || WebhookUrlState {
            webhook_url: channel.webhook_url.clone(),
        };
        match channel.kind.as_str() {
            KIND_EMAIL => {
                state.email = Some(EmailState {
                    emails: Some(vec_to_set(channel.emails.as_deref().unwrap_or_default())),
                })
            }
            KIND_OPS_GENIE => {
                state.ops_genie = Some(OpsGenieState {
                    api_key: channel.api_key.clone(),
                    tags: Some(
                        channel
                            .tags
                            .as_deref()
                            .unwrap_or_default()
                            .split(',')
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(str::to_string)
                            .collect(),
                    ),
                    region: channel.region.clone(),
                })
            }
            KIND_PAGER_DUTY => {
                state.pager_duty = Some(PagerDutyState {
                    service_integration_key: channel.service_integration_key.clone(),
                })
            }
            KIND_SLACK => {
                state.slack = Some(SlackState {
                    webhook_url: channel.webhook_url.clone(),
                    icon_url: channel.icon_url.clone(),
                    channel: channel.channel.clone(),
                })
            }
            KIND_SPLUNK => {
                state.splunk = Some(SplunkState {
                    url: channel.url.clone(),
                    token: channel.token.clone(),
                })
            }
            KIND_VICTOR_OPS => {
                state.victor_ops = Some(VictorOpsState {
                    api_key: channel.api_key.clone(),
                    routing_key: channel.routing_key.clone(),
                })
            }
            KIND_WEBHOOK => {
                state.webhook = Some(WebhookState {
                    webhook_urls: Some(vec_to_set(channel.webhook_urls.as_deref().unwrap_or_default())),
                    http_headers: channel.headers.as_deref().map(headers_from_api),
                })
            }
            KIND_OFFICE_365 => state.office_365 = Some(webhook_url()),
            KIND_GOOGLE_CHAT => state.google_chat = Some(webhook_url()),
            KIND_PROMETHEUS_WEBHOOK => {
                state.prometheus_webhook = Some(PrometheusWebhookState {
                    webhook_url: channel.webhook_url.clone(),
                    receiver: channel.receiver.clone(),
                })
            }
            KIND_WEBEX_TEAMS_WEBHOOK => state.webex_teams_webhook = Some(webhook_url()),
            other => {
                return Err(Error::malformed(format!(
                    "unsupported alerting channel kind '{other}'"
                )))
            }
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_round_trip_through_wire_format() {
        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), "Bearer abc".to_string());
        headers.insert("X-Env".to_string(), "prod".to_string());

        let wire = headers_to_api(&headers);
        assert_eq!(wire, vec!["Authorization: Bearer abc", "X-Env: prod"]);
        assert_eq!(headers_from_api(&wire), headers);
    }

    #[test]
    fn test_headers_without_separator_are_dropped() {
        let parsed = headers_from_api(&["garbage".to_string(), "A: b".to_string()]);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["A"], "b");
    }
}
