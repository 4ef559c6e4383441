//! Tests for the REST API module

use super::*;
use crate::codec::CustomPayloadField;
use crate::error::ErrorKind;
use crate::http::{HttpClientConfig, InstanaClient, RestClient};
use crate::types::Context;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
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

fn sample_group() -> Group {
    Group {
        id: "group-1".to_string(),
        name: "operators".to_string(),
        ..Default::default()
    }
}

// ============================================================================
// Verb policy
// ============================================================================

#[tokio::test]
async fn test_post_create_targets_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GROUPS_PATH))
        .and(body_partial_json(json!({"name": "operators"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "server-assigned",
            "name": "operators",
            "permissionSet": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let created = api
        .groups()
        .create(&Context::new(), &sample_group())
        .await
        .unwrap();

    assert_eq!(created.id, "server-assigned");
}

#[tokio::test]
async fn test_put_update_targets_resource_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{GROUPS_PATH}/group-1")))
        .and(body_partial_json(json!({"id": "group-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "group-1",
            "name": "renamed",
            "permissionSet": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let updated = api
        .groups()
        .update(&Context::new(), &sample_group())
        .await
        .unwrap();

    assert_eq!(updated.name, "renamed");
}

#[tokio::test]
async fn test_put_create_uses_client_side_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{ALERTING_CHANNELS_PATH}/channel-1")))
        .and(body_partial_json(json!({"kind": "EMAIL"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "channel-1",
            "name": "ops mail",
            "kind": "EMAIL",
            "emails": ["ops@example.com"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let mut channel = AlertingChannel::new("channel-1", "ops mail", alerting_channel::KIND_EMAIL);
    channel.emails = Some(vec!["ops@example.com".to_string()]);

    let created = api
        .alerting_channels()
        .create(&Context::new(), &channel)
        .await
        .unwrap();
    assert_eq!(created, channel);
}

#[tokio::test]
async fn test_post_update_targets_resource_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{SYNTHETIC_TESTS_PATH}/test-1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let test = SyntheticTest {
        id: "test-1".to_string(),
        label: "ping".to_string(),
        ..Default::default()
    };

    let updated = api
        .synthetic_tests()
        .update(&Context::new(), &test)
        .await
        .unwrap();
    assert_eq!(updated, test);
}

#[tokio::test]
async fn test_update_unsupported_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let sli = SliConfig {
        id: "sli-1".to_string(),
        name: "latency".to_string(),
        ..Default::default()
    };

    let err = api
        .sli_configs()
        .update(&Context::new(), &sli)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationNotSupported);
}

// ============================================================================
// Reads and deletes
// ============================================================================

#[tokio::test]
async fn test_get_one_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{SLO_CONFIGS_PATH}/missing")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let err = api
        .slo_configs()
        .get_one(&Context::new(), "missing")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_unknown_id_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{API_TOKENS_PATH}/does-not-exist")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    api.api_tokens()
        .delete_by_id(&Context::new(), "does-not-exist")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_uses_internal_id_for_api_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{API_TOKENS_PATH}/internal-1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let token = ApiToken {
        id: "secret-id".to_string(),
        internal_id: "internal-1".to_string(),
        name: "ci".to_string(),
        ..Default::default()
    };
    api.api_tokens().delete(&Context::new(), &token).await.unwrap();
}

#[tokio::test]
async fn test_delete_propagates_other_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{GROUPS_PATH}/group-1")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let err = api
        .groups()
        .delete_by_id(&Context::new(), "group-1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[tokio::test]
async fn test_get_all_host_agents_items_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOST_AGENTS_PATH))
        .and(query_param("query", "entity.zone:prod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"snapshotId": "snap-1", "label": "a", "host": "h1", "plugin": "host", "tags": ["x"]},
                {"snapshotId": "snap-2", "label": "b", "host": "h2", "plugin": "host", "tags": []}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let query = crate::types::StringMap::from([(
        "query".to_string(),
        "entity.zone:prod".to_string(),
    )]);
    let agents = api
        .host_agents()
        .get_by_query(&Context::new(), &query)
        .await
        .unwrap();

    assert_eq!(agents.len(), 2);
    assert_eq!(agents[1].id_for_path(), "snap-2");
}

// ============================================================================
// Payload field adapter wiring
// ============================================================================

#[tokio::test]
async fn test_alert_config_reads_custom_payload_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{WEBSITE_ALERT_CONFIGS_PATH}/alert-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "alert-1",
            "name": "slow pages",
            "description": "",
            "triggering": false,
            "websiteId": "web-1",
            "alertChannelIds": [],
            "granularity": 600000,
            "rule": {"alertType": "slowness", "metricName": "onLoadTime", "aggregation": "P90"},
            "threshold": {"type": "staticThreshold", "operator": ">=", "value": 5.0},
            "timeThreshold": {"type": "violationsInSequence", "timeWindow": 600000},
            "customPayloadFields": [
                {"type": "staticString", "key": "team", "value": "web"},
                {"type": "dynamic", "key": "zone", "value": {"tagName": "agent.zone"}}
            ]
        })))
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let config = api
        .website_alert_configs()
        .get_one(&Context::new(), "alert-1")
        .await
        .unwrap();

    assert_eq!(
        config.custom_payload_fields,
        vec![
            CustomPayloadField::static_string("team", "web"),
            CustomPayloadField::dynamic("zone", "agent.zone", None),
        ]
    );
}

// ============================================================================
// Website monitoring configs
// ============================================================================

#[tokio::test]
async fn test_website_monitoring_config_create_by_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(WEBSITE_MONITORING_CONFIGS_PATH))
        .and(query_param("name", "shop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "web-1",
            "name": "shop",
            "appName": "shop-app"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let created = api
        .website_monitoring_configs()
        .create(
            &Context::new(),
            &WebsiteMonitoringConfig {
                name: "shop".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(created.id, "web-1");
    assert_eq!(created.app_name, "shop-app");
}

#[tokio::test]
async fn test_website_monitoring_config_update_by_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{WEBSITE_MONITORING_CONFIGS_PATH}/web-1")))
        .and(query_param("name", "store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "web-1",
            "name": "store",
            "appName": "shop-app"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = test_api(&mock_server);
    let updated = api
        .website_monitoring_configs()
        .update(
            &Context::new(),
            &WebsiteMonitoringConfig {
                id: "web-1".to_string(),
                name: "store".to_string(),
                app_name: "shop-app".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "store");
}

// ============================================================================
// Entity shapes
// ============================================================================

#[test]
fn test_tag_filter_wire_shape() {
    let filter = TagFilter::expression(
        LogicalOperator::And,
        vec![
            TagFilter::Tag(TagFilterElement {
                string_value: Some("host".to_string()),
                value: Some("host".to_string()),
                entity: Some(TagFilterEntity::NotApplicable),
                ..TagFilterElement::new("entity.type", TagFilterOperator::Equals)
            }),
            TagFilter::Tag(TagFilterElement::new("agent.zone", TagFilterOperator::NotEmpty)),
        ],
    );

    let value = serde_json::to_value(&filter).unwrap();
    assert_eq!(value["type"], "EXPRESSION");
    assert_eq!(value["logicalOperator"], "AND");
    assert_eq!(value["elements"][0]["type"], "TAG_FILTER");
    assert_eq!(value["elements"][0]["operator"], "EQUALS");
    assert_eq!(value["elements"][0]["entity"], "NOT_APPLICABLE");
    assert_eq!(value["elements"][1]["operator"], "NOT_EMPTY");
    assert!(value["elements"][1].get("stringValue").is_none());

    let decoded: TagFilter = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, filter);
}

#[test]
fn test_api_token_permissions_flatten() {
    let token: ApiToken = serde_json::from_value(json!({
        "id": "id-1",
        "accessGrantingToken": "secret",
        "internalId": "internal-1",
        "name": "ci",
        "canConfigureUsers": true,
        "canViewLogs": false
    }))
    .unwrap();

    assert!(token.permission("canConfigureUsers"));
    assert!(!token.permission("canViewLogs"));
    assert!(!token.permission("canInstallNewAgents"));
    assert_eq!(token.id_for_path(), "internal-1");
}

#[test]
fn test_group_wire_names() {
    let mut group = sample_group();
    group.permission_set.kubernetes_cluster_uuids = vec![group::ScopeBinding::new("k8s-1")];
    group.permission_set.permissions = vec!["CAN_CONFIGURE_USERS".to_string()];

    let value = serde_json::to_value(&group).unwrap();
    assert_eq!(value["permissionSet"]["kubernetesClusterUUIDs"][0]["scopeId"], "k8s-1");
    assert_eq!(value["permissionSet"]["permissions"][0], "CAN_CONFIGURE_USERS");
}
