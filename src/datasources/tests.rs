//! Tests for data sources

use super::*;
use crate::error::ErrorKind;
use crate::http::{HttpClientConfig, InstanaClient, RestClient};
use crate::resources::alerting_channel::AlertingChannelState;
use crate::restapi::{
    ALERTING_CHANNELS_PATH, AUTOMATION_ACTIONS_PATH, BUILTIN_EVENT_SPECIFICATIONS_PATH,
    CUSTOM_EVENT_SPECIFICATIONS_PATH, HOST_AGENTS_PATH, SYNTHETIC_LOCATIONS_PATH,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_api(server: &MockServer) -> InstanaApi {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .api_token("test-token")
        .backoff(Duration::from_millis(1), 4, Duration::from_millis(10))
        .no_rate_limit()
        .build();
    let client: Arc<dyn RestClient> = Arc::new(InstanaClient::new(config).unwrap());
    InstanaApi::new(client)
}

async fn mount_locations(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(SYNTHETIC_LOCATIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "loc-1", "label": "London", "description": "eu", "locationType": "Public"},
            {"id": "loc-2", "label": "Dublin", "description": "eu", "locationType": "Public"},
            {"id": "loc-3", "label": "Lab", "description": "", "locationType": "Private"}
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_host_agents_passes_filter_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(HOST_AGENTS_PATH))
        .and(query_param("query", "entity.zone:eu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"snapshotId": "snap-1", "label": "web-1", "host": "h1", "plugin": "host", "tags": ["web"]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = HostAgentsDataSource::new(&test_api(&server));
    let result = source
        .read(
            &Context::new(),
            HostAgentsQuery {
                filter: "entity.zone:eu".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].snapshot_id, "snap-1");
    assert_eq!(result.items[0].tags, vec!["web"]);
}

#[tokio::test]
async fn test_builtin_event_spec_matches_name_and_plugin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(BUILTIN_EVENT_SPECIFICATIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "shortPluginId": "host", "name": "High CPU", "severity": 5, "triggering": false, "enabled": true},
            {"id": "b", "shortPluginId": "jvm", "name": "High CPU", "severity": 10, "triggering": true, "enabled": true}
        ])))
        .mount(&server)
        .await;

    let source = BuiltinEventSpecDataSource::new(&test_api(&server));
    let ctx = Context::new();
    let found = source
        .read(
            &ctx,
            BuiltinEventSpecQuery {
                name: "High CPU".to_string(),
                short_plugin_id: "jvm".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(found.id.as_deref(), Some("b"));
    assert_eq!(found.severity.as_deref(), Some("critical"));
    assert_eq!(found.triggering, Some(true));

    let err = source
        .read(
            &ctx,
            BuiltinEventSpecQuery {
                name: "High CPU".to_string(),
                short_plugin_id: "python".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_synthetic_location_requires_single_match() {
    let server = MockServer::start().await;
    mount_locations(&server).await;
    let source = SyntheticLocationDataSource::new(&test_api(&server));
    let ctx = Context::new();

    let found = source
        .read(
            &ctx,
            SyntheticLocationQuery {
                location_type: Some("Private".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(found.id.as_deref(), Some("loc-3"));

    let err = source
        .read(
            &ctx,
            SyntheticLocationQuery {
                location_type: Some("Public".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);

    let err = source
        .read(
            &ctx,
            SyntheticLocationQuery {
                label: Some("Paris".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_dyn_data_source_round_trips_json() {
    let server = MockServer::start().await;
    mount_locations(&server).await;

    let sources = all_data_sources(&test_api(&server));
    let source = sources
        .iter()
        .find(|s| s.name() == "instana_synthetic_location")
        .unwrap();

    let result = source
        .read_json(&Context::new(), json!({"label": "London"}))
        .await
        .unwrap();
    assert_eq!(result["id"], "loc-1");
    assert_eq!(result["location_type"], "Public");
}

#[tokio::test]
async fn test_alerting_channel_reports_channel_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ALERTING_CHANNELS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "ch-1", "name": "mail", "kind": "EMAIL", "emails": ["a@example.com"]},
            {"id": "ch-2", "name": "chat", "kind": "SLACK", "webhookUrl": "https://hooks.slack.test", "channel": "#ops"}
        ])))
        .mount(&server)
        .await;

    let source = AlertingChannelDataSource::new(&test_api(&server));
    let found = source
        .read(
            &Context::new(),
            AlertingChannelState {
                name: "chat".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(found.id, "ch-2");
    assert!(found.email.is_none());
    let slack = found.slack.unwrap();
    assert_eq!(slack.webhook_url.as_deref(), Some("https://hooks.slack.test"));
    assert_eq!(slack.channel.as_deref(), Some("#ops"));

    let err = source
        .read(
            &Context::new(),
            AlertingChannelState {
                name: "pager".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_automation_action_matches_type_case_insensitively() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AUTOMATION_ACTIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a-1", "name": "restart", "type": "SCRIPT", "tags": ["ops"]},
            {"id": "a-2", "name": "restart", "type": "HTTP", "description": "webhook"}
        ])))
        .mount(&server)
        .await;

    let source = AutomationActionDataSource::new(&test_api(&server));
    let found = source
        .read(
            &Context::new(),
            AutomationActionQuery {
                name: "restart".to_string(),
                kind: "http".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(found.id.as_deref(), Some("a-2"));
    assert_eq!(found.kind, "HTTP");
    assert_eq!(found.description.as_deref(), Some("webhook"));
    assert_eq!(found.tags, None);
}

#[tokio::test]
async fn test_automation_action_requires_type() {
    let server = MockServer::start().await;
    let source = AutomationActionDataSource::new(&test_api(&server));

    let err = source
        .read(
            &Context::new(),
            AutomationActionQuery {
                name: "restart".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_custom_event_specification_matches_name_and_entity_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CUSTOM_EVENT_SPECIFICATIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "e-1", "name": "disk", "entityType": "host", "enabled": true, "rules": []},
            {"id": "e-2", "name": "disk", "entityType": "docker", "triggering": true,
             "query": "entity.zone:eu", "expirationTime": 60000, "enabled": false, "rules": []}
        ])))
        .mount(&server)
        .await;

    let source = CustomEventSpecificationDataSource::new(&test_api(&server));
    let found = source
        .read(
            &Context::new(),
            CustomEventSpecificationQuery {
                name: "disk".to_string(),
                entity_type: "docker".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(found.id.as_deref(), Some("e-2"));
    assert_eq!(found.query.as_deref(), Some("entity.zone:eu"));
    assert_eq!(found.expiration_time, Some(60_000));
    assert_eq!(found.triggering, Some(true));
    assert_eq!(found.enabled, Some(false));
}
