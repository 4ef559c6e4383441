//! Tests for provider dispatch

use super::*;
use crate::config::ProviderConfig;
use crate::error::ErrorKind;
use crate::http::HttpClientConfig;
use crate::restapi::{API_TOKENS_PATH, HOST_AGENTS_PATH};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn test_provider(server: &MockServer) -> Provider {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .api_token("test-token")
        .backoff(Duration::from_millis(1), 4, Duration::from_millis(10))
        .no_rate_limit()
        .build();
    Provider::with_client(Arc::new(InstanaClient::new(config).unwrap()))
}

fn echo(request: &Request) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_bytes(request.body.clone())
}

#[test_case("create", Operation::Create)]
#[test_case("READ", Operation::Read)]
#[test_case("Update", Operation::Update)]
#[test_case("delete", Operation::Delete)]
#[test_case("import", Operation::Import)]
fn test_operation_from_str(input: &str, expected: Operation) {
    assert_eq!(input.parse::<Operation>().unwrap(), expected);
    assert_eq!(expected.to_string(), expected.as_str());
}

#[test]
fn test_operation_from_str_rejects_unknown() {
    let err = "upsert".parse::<Operation>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
}

#[test]
fn test_configure_rejects_missing_token() {
    let err = Provider::configure(ProviderConfig::new("", "tenant.instana.io")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_configure_registers_everything() {
    let provider = Provider::configure(ProviderConfig::new("token", "tenant.instana.io")).unwrap();

    let names = provider.resource_names();
    assert_eq!(names.len(), 21);
    assert!(names.windows(2).all(|w| w[0] < w[1]));
    assert!(names.contains(&"instana_application_alert_config"));
    assert!(names.contains(&"instana_global_application_alert_config"));
    assert!(names.contains(&"instana_alerting_config"));
    assert!(names.contains(&"instana_log_alert_config"));

    assert_eq!(
        provider.data_source_names(),
        vec![
            "instana_alerting_channel",
            "instana_automation_action",
            "instana_builtin_event_spec",
            "instana_custom_event_specification",
            "instana_host_agents",
            "instana_synthetic_location"
        ]
    );
    assert_eq!(provider.schemas().len(), 21);
}

#[test]
fn test_unknown_resource_type() {
    let provider = Provider::configure(ProviderConfig::new("token", "tenant.instana.io")).unwrap();
    let err = provider.resource("instana_teapot").err().unwrap();
    assert!(matches!(err, Error::UnknownResource { ref name } if name == "instana_teapot"));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_apply_create_then_read_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_TOKENS_PATH))
        .respond_with(echo)
        .expect(1)
        .mount(&server)
        .await;

    let provider = test_provider(&server);
    let ctx = Context::new();
    let created = provider
        .apply(
            &ctx,
            "instana_api_token",
            Operation::Create,
            OperationRequest {
                plan: Some(json!({"name": "ci", "can_view_logs": true})),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created["name"], "ci");
    assert_eq!(created["can_view_logs"], true);
    let internal_id = created["internal_id"].as_str().unwrap().to_string();
    assert!(!internal_id.is_empty());

    Mock::given(method("GET"))
        .and(path(format!("{API_TOKENS_PATH}/{internal_id}")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let read = provider
        .apply(
            &ctx,
            "instana_api_token",
            Operation::Read,
            OperationRequest {
                state: Some(created),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(read, JsonValue::Null);
}

#[tokio::test]
async fn test_apply_delete_treats_not_found_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{API_TOKENS_PATH}/gone")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let provider = test_provider(&server);
    let result = provider
        .apply(
            &Context::new(),
            "instana_api_token",
            Operation::Delete,
            OperationRequest {
                state: Some(json!({"id": "gone", "internal_id": "gone", "name": "old"})),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result, JsonValue::Null);
}

#[tokio::test]
async fn test_apply_requires_operation_inputs() {
    let server = MockServer::start().await;
    let provider = test_provider(&server);
    let ctx = Context::new();

    let err = provider
        .apply(&ctx, "instana_api_token", Operation::Update, OperationRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { ref field, .. } if field == "plan"));

    let err = provider
        .apply(
            &ctx,
            "instana_api_token",
            Operation::Import,
            OperationRequest {
                id: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { ref field, .. } if field == "id"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_data_source_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(HOST_AGENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"snapshotId": "snap-1", "label": "db-1", "host": "h1", "plugin": "host"}]
        })))
        .mount(&server)
        .await;

    let provider = test_provider(&server);
    let result = provider
        .read_data_source(
            &Context::new(),
            "instana_host_agents",
            json!({"filter": "entity.type:host"}),
        )
        .await
        .unwrap();
    assert_eq!(result["items"][0]["snapshot_id"], "snap-1");

    let err = provider
        .read_data_source(&Context::new(), "instana_nothing", json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
