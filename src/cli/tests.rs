//! Tests for the CLI surface and HTTP server mode

use super::*;
use crate::http::{HttpClientConfig, InstanaClient};
use crate::provider::Provider;
use crate::restapi::API_TOKENS_PATH;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_router(server: &MockServer) -> axum::Router {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .api_token("test-token")
        .backoff(Duration::from_millis(1), 4, Duration::from_millis(10))
        .no_rate_limit()
        .build();
    router(Provider::with_client(Arc::new(InstanaClient::new(config).unwrap())))
}

async fn call(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[test]
fn test_cli_parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "instana-provider",
        "import",
        "instana_api_token",
        "token-1",
        "--endpoint",
        "tenant.instana.io",
        "--api-token",
        "secret",
    ])
    .unwrap();
    assert_eq!(cli.endpoint.as_deref(), Some("tenant.instana.io"));
    assert_eq!(cli.api_token.as_deref(), Some("secret"));
    assert!(matches!(
        cli.command,
        Commands::Import { ref resource_type, ref id } if resource_type == "instana_api_token" && id == "token-1"
    ));
}

#[test]
fn test_cli_parses_normalize_filter() {
    let cli = Cli::try_parse_from([
        "instana-provider",
        "normalize-filter",
        "service.name equals 'cart'",
        "--wire",
    ])
    .unwrap();
    assert!(matches!(cli.command, Commands::NormalizeFilter { wire: true, .. }));
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let (status, body) = call(
        test_router(&server),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_list_resources() {
    let server = MockServer::start().await;
    let (status, body) = call(
        test_router(&server),
        Request::get("/resources").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["resources"].as_array().unwrap().len(), 21);
    assert_eq!(body["data"]["data_sources"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_create_through_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_TOKENS_PATH))
        .and(header("authorization", "apiToken test-token"))
        .respond_with(|request: &wiremock::Request| {
            ResponseTemplate::new(200).set_body_bytes(request.body.clone())
        })
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = call(
        test_router(&server),
        post_json(
            "/resources/instana_api_token/create",
            &json!({"plan": {"name": "ci", "can_view_logs": true}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "ci");
    assert_eq!(body["data"]["can_view_logs"], true);
}

#[tokio::test]
async fn test_error_envelope_carries_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API_TOKENS_PATH}/missing")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (status, body) = call(
        test_router(&server),
        post_json("/resources/instana_api_token/import", &json!({"id": "missing"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["kind"], "NotFound");
    assert!(body.get("data").is_none());

    let (status, body) = call(
        test_router(&server),
        post_json("/resources/instana_api_token/upsert", &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "InvalidRequest");

    let (status, body) = call(
        test_router(&server),
        post_json("/resources/instana_teapot/read", &json!({"state": {"id": "x"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "Configuration");
}
