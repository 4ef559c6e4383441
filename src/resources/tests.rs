//! Tests for resource handles and the lifecycle driver

use super::*;
use crate::error::{Error, ErrorKind};
use crate::http::{HttpClientConfig, InstanaClient, RestClient};
use crate::mapping::{SeverityThresholdsState, StaticThresholdState, ThresholdState};
use crate::restapi::{
    ALERTING_CONFIGS_PATH, API_TOKENS_PATH, APPLICATION_CONFIGS_PATH, LOG_ALERT_CONFIGS_PATH,
    SLI_CONFIGS_PATH,
};
use crate::types::{Context, Severity};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use test_case::test_case;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

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

fn echo(request: &Request) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_bytes(request.body.clone())
}

fn invalid_field(err: &Error) -> &str {
    match err {
        Error::InvalidConfiguration { field, .. } => field,
        other => panic!("expected invalid configuration, got {other:?}"),
    }
}

fn static_threshold(operator: &str, value: f64) -> ThresholdState {
    ThresholdState {
        static_threshold: Some(StaticThresholdState {
            operator: Some(operator.to_string()),
            value: Some(value),
        }),
        ..Default::default()
    }
}

// ============================================================================
// Registry
// ============================================================================

#[tokio::test]
async fn test_registry_lists_every_resource_once() {
    let server = MockServer::start().await;
    let resources = all_resources(&test_api(&server));

    let names: BTreeSet<&str> = resources.iter().map(|r| r.metadata().resource_name).collect();
    assert_eq!(resources.len(), 21);
    assert_eq!(names.len(), 21);
    assert!(names.contains("instana_rbac_group"));
    assert!(names.contains("instana_global_application_alert_config"));
    assert!(names.contains("instana_website_monitoring_config"));
    assert!(names.contains("instana_log_alert_config"));
    assert!(names.contains("instana_alerting_config"));
}

// ============================================================================
// Driver lifecycle
// ============================================================================

#[tokio::test]
async fn test_create_generates_id_and_applies_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(APPLICATION_CONFIGS_PATH))
        .and(body_partial_json(json!({
            "label": "shop",
            "scope": "INCLUDE_NO_DOWNSTREAM",
            "boundaryScope": "DEFAULT",
            "accessRules": [{"accessType": "READ_WRITE", "relationType": "GLOBAL"}]
        })))
        .respond_with(echo)
        .expect(1)
        .mount(&server)
        .await;

    let driver = ResourceDriver::new(
        application_config::ApplicationConfigResource::new(),
        &test_api(&server),
    );
    let plan = application_config::ApplicationConfigState {
        label: "shop".to_string(),
        tag_filter: Some("service.name EQUALS 'cart'".to_string()),
        ..Default::default()
    };

    let state = driver.create(&Context::new(), plan).await.unwrap();
    assert!(Uuid::parse_str(&state.id).is_ok());
    assert_eq!(state.scope.as_deref(), Some("INCLUDE_NO_DOWNSTREAM"));
    assert_eq!(
        state.tag_filter.as_deref(),
        Some(r#"service.name EQUALS "cart""#)
    );
}

#[tokio::test]
async fn test_update_grafts_id_into_path_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{APPLICATION_CONFIGS_PATH}/app-1")))
        .and(body_partial_json(json!({"id": "app-1", "label": "renamed"})))
        .respond_with(echo)
        .expect(1)
        .mount(&server)
        .await;

    let driver = ResourceDriver::new(
        application_config::ApplicationConfigResource::new(),
        &test_api(&server),
    );
    let stored = application_config::ApplicationConfigState {
        id: "app-1".to_string(),
        label: "shop".to_string(),
        ..Default::default()
    };
    let plan = application_config::ApplicationConfigState {
        label: "renamed".to_string(),
        ..Default::default()
    };

    let state = driver.update(&Context::new(), plan, &stored).await.unwrap();
    assert_eq!(state.id, "app-1");
    assert_eq!(state.label, "renamed");
}

#[tokio::test]
async fn test_read_not_found_marks_resource_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{APPLICATION_CONFIGS_PATH}/gone")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let driver = ResourceDriver::new(
        application_config::ApplicationConfigResource::new(),
        &test_api(&server),
    );
    let stored = application_config::ApplicationConfigState {
        id: "gone".to_string(),
        ..Default::default()
    };

    assert!(driver.read(&Context::new(), &stored).await.unwrap().is_none());
}

#[tokio::test]
async fn test_read_rejects_empty_id() {
    let server = MockServer::start().await;
    let driver = ResourceDriver::new(
        application_config::ApplicationConfigResource::new(),
        &test_api(&server),
    );

    let err = driver
        .read(&Context::new(), &Default::default())
        .await
        .unwrap_err();
    assert_eq!(invalid_field(&err), "id");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sli_update_is_not_supported_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SLI_CONFIGS_PATH))
        .respond_with(echo)
        .expect(1)
        .mount(&server)
        .await;

    let driver = ResourceDriver::new(sli_config::SliConfigResource::new(), &test_api(&server));
    let plan = sli_config::SliConfigState {
        name: "latency".to_string(),
        initial_evaluation_timestamp: 0,
        metric_configuration: Some(sli_config::MetricConfigurationState {
            metric_name: "latency".to_string(),
            aggregation: "P90".to_string(),
            threshold: 250.0,
        }),
        sli_entity: sli_config::SliEntityState {
            application_time_based: Some(sli_config::ApplicationTimeBasedState {
                application_id: Some("app-1".to_string()),
                boundary_scope: Some("ALL".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    let ctx = Context::new();
    let created = driver.create(&ctx, plan.clone()).await.unwrap();
    assert!(!created.id.is_empty());

    let err = driver.update(&ctx, plan, &created).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationNotSupported);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    assert!(driver.handle().metadata().create_only);
}

#[tokio::test]
async fn test_create_only_update_fails_before_mapping() {
    let server = MockServer::start().await;
    let driver = ResourceDriver::new(sli_config::SliConfigResource::new(), &test_api(&server));
    let state = sli_config::SliConfigState {
        id: "sli-1".to_string(),
        ..Default::default()
    };

    // the empty plan would fail mapping; the create-only check comes first
    let err = driver
        .update(&Context::new(), sli_config::SliConfigState::default(), &state)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OperationNotSupported { ref resource } if resource == sli_config::RESOURCE_NAME));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_api_token_uses_internal_id_for_paths() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_TOKENS_PATH))
        .respond_with(echo)
        .expect(1)
        .mount(&server)
        .await;

    let driver = ResourceDriver::new(api_token::ApiTokenResource::new(), &test_api(&server));
    let mut permissions = BTreeMap::new();
    permissions.insert("can_configure_users".to_string(), true);
    let plan = api_token::ApiTokenState {
        name: "ci".to_string(),
        permissions,
        ..Default::default()
    };

    let ctx = Context::new();
    let created = driver.create(&ctx, plan).await.unwrap();
    assert!(Uuid::parse_str(&created.internal_id).is_ok());
    assert!(Uuid::parse_str(&created.access_granting_token).is_ok());
    assert_ne!(created.internal_id, created.id);
    assert_eq!(created.permissions["can_configure_users"], true);
    assert_eq!(created.permissions["can_view_logs"], false);

    Mock::given(method("GET"))
        .and(path(format!("{API_TOKENS_PATH}/{}", created.internal_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": created.id,
            "accessGrantingToken": created.access_granting_token,
            "internalId": created.internal_id,
            "name": "ci",
            "canConfigureUsers": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let imported = driver.import(&ctx, &created.internal_id).await.unwrap();
    assert_eq!(imported, created);
}

#[test]
fn test_api_token_rejects_unknown_permission() {
    let handle = api_token::ApiTokenResource::new();
    let mut permissions = BTreeMap::new();
    permissions.insert("can_fly".to_string(), true);
    let state = api_token::ApiTokenState {
        name: "ci".to_string(),
        permissions,
        ..Default::default()
    };

    let err = handle.map_state_to_api(&state).unwrap_err();
    assert_eq!(invalid_field(&err), "can_fly");
}

#[tokio::test]
async fn test_dyn_resource_reports_undecodable_plan() {
    let server = MockServer::start().await;
    let resource: Arc<dyn DynResource> = Arc::new(ResourceDriver::new(
        application_config::ApplicationConfigResource::new(),
        &test_api(&server),
    ));

    let err = resource
        .create_json(&Context::new(), json!({"label": 42}))
        .await
        .unwrap_err();
    assert_eq!(invalid_field(&err), "plan");
}

#[tokio::test]
async fn test_cancelled_context_stops_create() {
    let server = MockServer::start().await;
    let driver = ResourceDriver::new(
        application_config::ApplicationConfigResource::new(),
        &test_api(&server),
    );
    let ctx = Context::new();
    ctx.cancel();

    let err = driver
        .create(&ctx, Default::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transient);
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Mappers
// ============================================================================

fn website_alert_state() -> website_alert_config::WebsiteAlertConfigState {
    website_alert_config::WebsiteAlertConfigState {
        name: "slow pages".to_string(),
        website_id: "web-1".to_string(),
        rule: website_alert_config::RuleBlocks {
            throughput: Some(website_alert_config::MetricRuleState {
                metric_name: Some("beaconCount".to_string()),
                aggregation: Some("SUM".to_string()),
            }),
            ..Default::default()
        },
        threshold: static_threshold(">", 10.0),
        time_threshold: website_alert_config::TimeThresholdState {
            violations_in_sequence: Some(website_alert_config::ViolationsInSequenceState {
                time_window: Some(600_000),
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_website_alert_throughput_rule_sets_alert_type() {
    let handle = website_alert_config::WebsiteAlertConfigResource::new();
    let config = handle.map_state_to_api(&website_alert_state()).unwrap();

    assert_eq!(config.rule.alert_type, "throughput");
    assert_eq!(config.rule.metric_name, "beaconCount");
    assert_eq!(config.granularity, 600_000);
    assert!(!config.triggering);
}

#[test]
fn test_website_alert_with_two_rules_names_the_group() {
    let handle = website_alert_config::WebsiteAlertConfigResource::new();
    let mut state = website_alert_state();
    state.rule.slowness = Some(website_alert_config::MetricRuleState {
        metric_name: Some("onLoadTime".to_string()),
        aggregation: Some("P90".to_string()),
    });

    let err = handle.map_state_to_api(&state).unwrap_err();
    assert_eq!(invalid_field(&err), "rule");
}

#[test]
fn test_infra_alert_severity_thresholds_round_trip() {
    let handle = infra_alert_config::InfraAlertConfigResource::new();
    let state = infra_alert_config::InfraAlertConfigState {
        id: "infra-1".to_string(),
        name: "cpu".to_string(),
        rules: infra_alert_config::RulesState {
            generic_rule: Some(infra_alert_config::GenericRuleState {
                metric_name: "cpu.used".to_string(),
                entity_type: "host".to_string(),
                aggregation: Some("MAX".to_string()),
                cross_series_aggregation: None,
                regex: false,
                threshold_operator: ">".to_string(),
                threshold: SeverityThresholdsState {
                    warning: Some(static_threshold(">", 80.0)),
                    critical: Some(static_threshold(">", 95.0)),
                },
            }),
        },
        ..Default::default()
    };

    let config = handle.map_state_to_api(&state).unwrap();
    let restored = handle.update_state(&config, Some(&state)).unwrap();

    assert_eq!(restored.rules, state.rules);
    assert_eq!(restored.granularity, Some(600_000));
    assert_eq!(restored.evaluation_type.as_deref(), Some("CUSTOM"));
}

#[test]
fn test_alerting_channel_requires_exactly_one_kind() {
    let handle = alerting_channel::AlertingChannelResource::new();
    let state = alerting_channel::AlertingChannelState {
        name: "ops".to_string(),
        ..Default::default()
    };
    assert_eq!(invalid_field(&handle.map_state_to_api(&state).unwrap_err()), "channel");

    let state = alerting_channel::AlertingChannelState {
        name: "ops".to_string(),
        email: Some(alerting_channel::EmailState {
            emails: Some(BTreeSet::from(["a@example.com".to_string()])),
        }),
        slack: Some(alerting_channel::SlackState {
            webhook_url: Some("https://hooks.slack.test".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert_eq!(invalid_field(&handle.map_state_to_api(&state).unwrap_err()), "channel");
}

#[test]
fn test_alerting_channel_ops_genie_tags_are_comma_separated() {
    let handle = alerting_channel::AlertingChannelResource::new();
    let state = alerting_channel::AlertingChannelState {
        id: "ch-1".to_string(),
        name: "ops".to_string(),
        ops_genie: Some(alerting_channel::OpsGenieState {
            api_key: Some("key".to_string()),
            tags: Some(vec!["prod".to_string(), "db".to_string()]),
            region: Some("EU".to_string()),
        }),
        ..Default::default()
    };

    let channel = handle.map_state_to_api(&state).unwrap();
    assert_eq!(channel.kind, "OPS_GENIE");
    assert_eq!(channel.tags.as_deref(), Some("prod,db"));

    let restored = handle.update_state(&channel, None).unwrap();
    assert_eq!(restored, state);
}

#[test]
fn test_custom_event_rules_are_grouped_by_type() {
    let handle = custom_event_specification::CustomEventSpecificationResource::new();
    let state = custom_event_specification::CustomEventSpecificationState {
        id: "evt-1".to_string(),
        name: "disk".to_string(),
        entity_type: "host".to_string(),
        rules: custom_event_specification::RulesState {
            system: Some(custom_event_specification::SystemRuleState {
                severity: Some("critical".to_string()),
                system_rule_id: Some("system-rule".to_string()),
            }),
            threshold: Some(vec![custom_event_specification::ThresholdRuleState {
                severity: "warning".to_string(),
                metric_name: Some("fs.used".to_string()),
                window: Some(60_000),
                aggregation: Some("avg".to_string()),
                condition_operator: ">".to_string(),
                condition_value: Some(0.9),
                ..Default::default()
            }]),
            ..Default::default()
        },
        ..Default::default()
    };

    let spec = handle.map_state_to_api(&state).unwrap();
    assert_eq!(spec.rules.len(), 2);
    assert_eq!(spec.rule_logical_operator, "AND");
    assert!(spec.enabled);

    let restored = handle.update_state(&spec, Some(&state)).unwrap();
    assert_eq!(restored.rules, state.rules);
}

#[test]
fn test_custom_event_requires_a_rule() {
    let handle = custom_event_specification::CustomEventSpecificationResource::new();
    let state = custom_event_specification::CustomEventSpecificationState {
        name: "empty".to_string(),
        entity_type: "host".to_string(),
        ..Default::default()
    };

    assert_eq!(invalid_field(&handle.map_state_to_api(&state).unwrap_err()), "rules");
}

#[test]
fn test_synthetic_test_http_action_normalizes_expect_json() {
    let handle = synthetic_test::SyntheticTestResource::new();
    let state = synthetic_test::SyntheticTestState {
        id: "syn-1".to_string(),
        label: "ping".to_string(),
        active: true,
        locations: BTreeSet::from(["loc-1".to_string()]),
        http_action: Some(synthetic_test::HttpActionState {
            url: Some("https://example.com".to_string()),
            expect_json: Some(r#"{ "ok" : true }"#.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let test = handle.map_state_to_api(&state).unwrap();
    assert_eq!(test.configuration.synthetic_type, "HTTPAction");
    assert_eq!(test.playback_mode, "Simultaneous");
    assert_eq!(test.test_frequency, Some(15));

    let restored = handle.update_state(&test, Some(&state)).unwrap();
    let action = restored.http_action.unwrap();
    assert_eq!(action.expect_json.as_deref(), Some(r#"{"ok":true}"#));
}

#[test]
fn test_synthetic_test_requires_location() {
    let handle = synthetic_test::SyntheticTestResource::new();
    let state = synthetic_test::SyntheticTestState {
        label: "ping".to_string(),
        dns: Some(synthetic_test::DnsState {
            lookup: Some("example.com".to_string()),
            server: Some("1.1.1.1".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    assert_eq!(invalid_field(&handle.map_state_to_api(&state).unwrap_err()), "locations");
}

#[test]
fn test_automation_action_http_fields() {
    let handle = automation_action::AutomationActionResource::new();
    let state = automation_action::AutomationActionState {
        id: "act-1".to_string(),
        name: "restart".to_string(),
        http: Some(automation_action::HttpState {
            host: Some("https://ops.example.com/restart".to_string()),
            method: Some("post".to_string()),
            headers: Some(BTreeMap::from([("X-Env".to_string(), "prod".to_string())])),
            ..Default::default()
        }),
        ..Default::default()
    };

    let action = handle.map_state_to_api(&state).unwrap();
    assert_eq!(action.kind, "HTTP");
    assert_eq!(action.field("method"), Some("POST"));
    assert_eq!(action.field("headers"), Some(r#"{"X-Env":"prod"}"#));
    assert_eq!(action.field("ignoreCertErrors"), Some("false"));

    let restored = handle.update_state(&action, Some(&state)).unwrap();
    let http = restored.http.unwrap();
    assert_eq!(http.method.as_deref(), Some("POST"));
    assert_eq!(http.headers, state.http.unwrap().headers);
}

#[test]
fn test_custom_dashboard_widgets_are_normalized() {
    let handle = custom_dashboard::CustomDashboardResource::new();
    let state = custom_dashboard::CustomDashboardState {
        id: "dash-1".to_string(),
        title: "overview".to_string(),
        widgets: Some("[ { \"id\" : \"w1\" } ]".to_string()),
        ..Default::default()
    };

    let dashboard = handle.map_state_to_api(&state).unwrap();
    assert_eq!(dashboard.access_rules.len(), 1);

    let restored = handle.update_state(&dashboard, Some(&state)).unwrap();
    assert_eq!(restored.widgets.as_deref(), Some(r#"[{"id":"w1"}]"#));

    let broken = custom_dashboard::CustomDashboardState {
        title: "overview".to_string(),
        widgets: Some("[".to_string()),
        ..Default::default()
    };
    assert_eq!(invalid_field(&handle.map_state_to_api(&broken).unwrap_err()), "widgets");
}

#[test]
fn test_slo_correction_validates_duration_unit() {
    let handle = slo_correction_config::SloCorrectionConfigResource::new();
    let state = slo_correction_config::SloCorrectionConfigState {
        name: "maintenance".to_string(),
        scheduling: slo_correction_config::SchedulingState {
            start_time: 1_700_000_000_000,
            duration: 2,
            duration_unit: "week".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let err = handle.map_state_to_api(&state).unwrap_err();
    assert_eq!(invalid_field(&err), "scheduling.duration_unit");
}

#[test]
fn test_rbac_group_permission_set_round_trip() {
    let handle = rbac_group::RbacGroupResource::new();
    let state = rbac_group::RbacGroupState {
        id: "grp-1".to_string(),
        name: "operators".to_string(),
        member: BTreeSet::from([rbac_group::MemberState {
            user_id: "u-1".to_string(),
            email: Some("u1@example.com".to_string()),
        }]),
        permission_set: Some(rbac_group::PermissionSetState {
            application_ids: BTreeSet::from(["app-1".to_string()]),
            infra_dfq_filter: Some("entity.zone:eu".to_string()),
            permissions: BTreeSet::from(["CAN_CONFIGURE_APPLICATIONS".to_string()]),
            ..Default::default()
        }),
    };

    let group = handle.map_state_to_api(&state).unwrap();
    assert_eq!(group.permission_set.application_ids[0].scope_id, "app-1");

    let restored = handle.update_state(&group, Some(&state)).unwrap();
    assert_eq!(restored, state);
}

// ============================================================================
// Alerting and log alert configs
// ============================================================================

#[tokio::test]
async fn test_alerting_config_create_puts_under_generated_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path_regex(format!("^{ALERTING_CONFIGS_PATH}/[0-9a-f-]{{36}}$")))
        .and(body_partial_json(json!({
            "alertName": "ops",
            "integrationIds": ["ch-1"],
            "eventFilteringConfiguration": {"eventTypes": ["critical", "incident"]},
            "customPayloadFields": [{"type": "staticString", "key": "team", "value": "sre"}]
        })))
        .respond_with(echo)
        .expect(1)
        .mount(&server)
        .await;

    let driver = ResourceDriver::new(alerting_config::AlertingConfigResource::new(), &test_api(&server));
    let plan = alerting_config::AlertingConfigState {
        alert_name: "ops".to_string(),
        integration_ids: BTreeSet::from(["ch-1".to_string()]),
        event_filter_event_types: BTreeSet::from(["Incident".to_string(), "CRITICAL".to_string()]),
        custom_payload_field: Some(vec![crate::mapping::CustomPayloadFieldState {
            key: "team".to_string(),
            value: Some("sre".to_string()),
            dynamic_value: None,
        }]),
        ..Default::default()
    };

    let state = driver.create(&Context::new(), plan).await.unwrap();
    assert!(Uuid::parse_str(&state.id).is_ok());
    assert_eq!(
        state.event_filter_event_types,
        BTreeSet::from(["critical".to_string(), "incident".to_string()])
    );
    assert_eq!(state.custom_payload_field.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_alerting_config_rejects_unknown_event_type() {
    let handle = alerting_config::AlertingConfigResource::new();
    let state = alerting_config::AlertingConfigState {
        alert_name: "ops".to_string(),
        event_filter_event_types: BTreeSet::from(["earthquake".to_string()]),
        ..Default::default()
    };

    let err = handle.map_state_to_api(&state).unwrap_err();
    assert_eq!(invalid_field(&err), "event_filter_event_types");
}

#[test]
fn test_alerting_config_limits_alert_name_length() {
    let handle = alerting_config::AlertingConfigResource::new();
    let state = alerting_config::AlertingConfigState {
        alert_name: "x".repeat(257),
        ..Default::default()
    };

    let err = handle.map_state_to_api(&state).unwrap_err();
    assert_eq!(invalid_field(&err), "alert_name");
}

#[test]
fn test_alerting_config_rule_ids_round_trip() {
    let handle = alerting_config::AlertingConfigResource::new();
    let state = alerting_config::AlertingConfigState {
        id: "alert-1".to_string(),
        alert_name: "ops".to_string(),
        integration_ids: BTreeSet::from(["ch-1".to_string(), "ch-2".to_string()]),
        event_filter_query: Some("entity.zone:eu".to_string()),
        event_filter_rule_ids: BTreeSet::from(["rule-1".to_string()]),
        ..Default::default()
    };

    let config = handle.map_state_to_api(&state).unwrap();
    assert!(config.event_filtering_configuration.event_types.is_empty());
    assert_eq!(handle.update_state(&config, Some(&state)).unwrap(), state);
}

fn log_alert_state() -> log_alert_config::LogAlertConfigState {
    log_alert_config::LogAlertConfigState {
        id: "log-1".to_string(),
        name: "error logs".to_string(),
        description: "too many errors".to_string(),
        tag_filter: Some("log.level EQUALS 'ERROR'".to_string()),
        grace_period: Some(300_000),
        alert_channels: Some(crate::mapping::AlertChannelsState {
            warning: Some(BTreeSet::from(["ch-1".to_string()])),
            critical: None,
        }),
        group_by: vec![log_alert_config::GroupByState {
            tag_name: "host.name".to_string(),
            key: None,
        }],
        rules: Some(log_alert_config::LogRuleState {
            metric_name: "log.count".to_string(),
            alert_type: Some("log.count".to_string()),
            aggregation: Some("SUM".to_string()),
            threshold_operator: ">".to_string(),
            threshold: Some(SeverityThresholdsState {
                warning: Some(static_threshold(">", 100.0)),
                critical: None,
            }),
        }),
        time_threshold: Some(log_alert_config::TimeThresholdState {
            violations_in_sequence: Some(log_alert_config::ViolationsInSequenceState {
                time_window: Some(600_000),
            }),
        }),
        ..Default::default()
    }
}

#[test]
fn test_log_alert_round_trip_translates_alert_type() {
    let handle = log_alert_config::LogAlertConfigResource::new();
    let state = log_alert_state();

    let config = handle.map_state_to_api(&state).unwrap();
    assert_eq!(config.rules.len(), 1);
    assert_eq!(config.rules[0].rule.alert_type, "logCount");
    assert_eq!(config.granularity, 600_000);
    assert_eq!(config.alert_channels["WARNING"], vec!["ch-1"]);

    let restored = handle.update_state(&config, Some(&state)).unwrap();
    assert_eq!(restored.rules, state.rules);
    assert_eq!(restored.time_threshold, state.time_threshold);
    assert_eq!(restored.group_by, state.group_by);
    assert_eq!(restored.alert_channels, state.alert_channels);
    assert_eq!(restored.granularity, Some(600_000));
}

#[test]
fn test_log_alert_rejects_baseline_thresholds() {
    let handle = log_alert_config::LogAlertConfigResource::new();
    let mut state = log_alert_state();
    if let Some(rule) = state.rules.as_mut() {
        rule.threshold = Some(SeverityThresholdsState {
            warning: None,
            critical: Some(ThresholdState {
                adaptive_baseline: Some(crate::mapping::AdaptiveBaselineState {
                    operator: Some(">=".to_string()),
                    deviation_factor: Some(2.0),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        });
    }

    let err = handle.map_state_to_api(&state).unwrap_err();
    assert_eq!(invalid_field(&err), "rules.threshold.critical");
}

#[test]
fn test_log_alert_requires_tag_filter_and_known_granularity() {
    let handle = log_alert_config::LogAlertConfigResource::new();

    let mut state = log_alert_state();
    state.tag_filter = None;
    assert_eq!(invalid_field(&handle.map_state_to_api(&state).unwrap_err()), "tag_filter");

    let mut state = log_alert_state();
    state.granularity = Some(120_000);
    assert_eq!(invalid_field(&handle.map_state_to_api(&state).unwrap_err()), "granularity");
}

#[tokio::test]
async fn test_log_alert_create_posts_to_collection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOG_ALERT_CONFIGS_PATH))
        .and(body_partial_json(json!({
            "name": "error logs",
            "timeThreshold": {"type": "violationsInSequence", "timeWindow": 600000},
            "rules": [{"thresholdOperator": ">", "rule": {"alertType": "logCount", "metricName": "log.count"}}],
            "groupBy": [{"tagName": "host.name"}]
        })))
        .respond_with(echo)
        .expect(1)
        .mount(&server)
        .await;

    let driver = ResourceDriver::new(log_alert_config::LogAlertConfigResource::new(), &test_api(&server));
    let mut plan = log_alert_state();
    plan.id = String::new();

    let state = driver.create(&Context::new(), plan).await.unwrap();
    assert_eq!(state.name, "error logs");
    assert_eq!(state.tag_filter.as_deref(), Some(r#"log.level EQUALS "ERROR""#));
}

// ============================================================================
// One-of groups
// ============================================================================

/// Field named by a rejected mapping, `None` when mapping succeeded
fn rejected_field<T>(result: crate::error::Result<T>) -> Option<String> {
    result.err().map(|err| invalid_field(&err).to_string())
}

fn slo_state() -> slo_config::SloConfigState {
    slo_config::SloConfigState {
        name: "checkout latency".to_string(),
        target: 0.99,
        entity: slo_config::EntityState {
            website: Some(slo_config::WebsiteEntityState {
                website_id: Some("web-1".to_string()),
                beacon_type: Some("pageLoad".to_string()),
                filter_expression: None,
            }),
            ..Default::default()
        },
        indicator: slo_config::IndicatorState {
            event_based_availability: Some(slo_config::EventBasedAvailabilityState {}),
            ..Default::default()
        },
        time_window: slo_config::TimeWindowState {
            rolling: Some(slo_config::RollingWindowState {
                duration: Some(7),
                duration_unit: Some("day".to_string()),
                timezone: None,
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test_case(&[] => Some("entity".to_string()); "no entity")]
#[test_case(&["infrastructure"] => None; "one entity")]
#[test_case(&["application", "synthetic"] => Some("entity".to_string()); "two entities")]
fn test_slo_entity_one_of(blocks: &[&str]) -> Option<String> {
    let mut state = slo_state();
    state.entity = slo_config::EntityState::default();
    for block in blocks {
        match *block {
            "application" => {
                state.entity.application = Some(slo_config::ApplicationEntityState {
                    application_id: Some("app-1".to_string()),
                    boundary_scope: Some("INBOUND".to_string()),
                    ..Default::default()
                })
            }
            "synthetic" => {
                state.entity.synthetic = Some(slo_config::SyntheticEntityState {
                    synthetic_test_ids: Some(BTreeSet::from(["syn-1".to_string()])),
                    filter_expression: None,
                })
            }
            "infrastructure" => {
                state.entity.infrastructure = Some(slo_config::InfrastructureEntityState {
                    infra_type: Some("host".to_string()),
                    filter_expression: None,
                })
            }
            other => panic!("unknown entity block {other}"),
        }
    }
    rejected_field(slo_config::SloConfigResource::new().map_state_to_api(&state))
}

#[test_case(&[] => Some("indicator".to_string()); "no indicator")]
#[test_case(&["event_based_availability"] => None; "marker block alone")]
#[test_case(&["traffic"] => None; "one indicator")]
#[test_case(&["time_based_latency", "traffic"] => Some("indicator".to_string()); "two indicators")]
#[test_case(&["time_based_latency", "event_based_availability"] => Some("indicator".to_string()); "marker block counts as set")]
fn test_slo_indicator_one_of(blocks: &[&str]) -> Option<String> {
    let mut state = slo_state();
    state.indicator = slo_config::IndicatorState::default();
    for block in blocks {
        match *block {
            "time_based_latency" => {
                state.indicator.time_based_latency = Some(slo_config::ThresholdIndicatorState {
                    threshold: Some(250.0),
                    aggregation: Some("P90".to_string()),
                })
            }
            "event_based_availability" => {
                state.indicator.event_based_availability = Some(slo_config::EventBasedAvailabilityState {})
            }
            "traffic" => {
                state.indicator.traffic = Some(slo_config::TrafficIndicatorState {
                    traffic_type: Some("all".to_string()),
                    threshold: Some(1000.0),
                    operator: Some(">=".to_string()),
                })
            }
            other => panic!("unknown indicator block {other}"),
        }
    }
    rejected_field(slo_config::SloConfigResource::new().map_state_to_api(&state))
}

#[test_case(&[] => Some("time_window".to_string()); "no window")]
#[test_case(&["fixed"] => None; "one window")]
#[test_case(&["rolling", "fixed"] => Some("time_window".to_string()); "two windows")]
fn test_slo_time_window_one_of(blocks: &[&str]) -> Option<String> {
    let mut state = slo_state();
    state.time_window = slo_config::TimeWindowState::default();
    for block in blocks {
        match *block {
            "rolling" => {
                state.time_window.rolling = Some(slo_config::RollingWindowState {
                    duration: Some(1),
                    duration_unit: Some("week".to_string()),
                    timezone: None,
                })
            }
            "fixed" => {
                state.time_window.fixed = Some(slo_config::FixedWindowState {
                    duration: Some(1),
                    duration_unit: Some("month".to_string()),
                    timezone: Some("UTC".to_string()),
                    start_timestamp: Some(1_700_000_000_000.0),
                })
            }
            other => panic!("unknown window block {other}"),
        }
    }
    rejected_field(slo_config::SloConfigResource::new().map_state_to_api(&state))
}

#[test_case(&[] => Some("sli_entity".to_string()); "no entity")]
#[test_case(&["website_time_based"] => None; "one entity")]
#[test_case(&["application_time_based", "website_event_based"] => Some("sli_entity".to_string()); "two entities")]
fn test_sli_entity_one_of(blocks: &[&str]) -> Option<String> {
    let mut state = sli_config::SliConfigState {
        name: "availability".to_string(),
        ..Default::default()
    };
    for block in blocks {
        match *block {
            "application_time_based" => {
                state.sli_entity.application_time_based = Some(sli_config::ApplicationTimeBasedState {
                    application_id: Some("app-1".to_string()),
                    boundary_scope: Some("ALL".to_string()),
                    ..Default::default()
                })
            }
            "website_event_based" => {
                state.sli_entity.website_event_based = Some(sli_config::WebsiteEventBasedState {
                    website_id: Some("web-1".to_string()),
                    beacon_type: Some("httpRequest".to_string()),
                    ..Default::default()
                })
            }
            "website_time_based" => {
                state.sli_entity.website_time_based = Some(sli_config::WebsiteTimeBasedState {
                    website_id: Some("web-1".to_string()),
                    beacon_type: Some("pageLoad".to_string()),
                    filter_expression: None,
                })
            }
            other => panic!("unknown sli entity block {other}"),
        }
    }
    rejected_field(sli_config::SliConfigResource::new().map_state_to_api(&state))
}

fn application_alert_state() -> application_alert_config::ApplicationAlertConfigState {
    application_alert_config::ApplicationAlertConfigState {
        name: "errors on checkout".to_string(),
        rules: vec![application_alert_config::RuleState {
            threshold_operator: ">".to_string(),
            rule: application_alert_config::RuleBlocks {
                errors: Some(application_alert_config::MetricRuleState {
                    metric_name: Some("errors".to_string()),
                    aggregation: Some("SUM".to_string()),
                }),
                ..Default::default()
            },
            threshold: SeverityThresholdsState {
                warning: Some(static_threshold(">", 5.0)),
                critical: None,
            },
        }],
        ..Default::default()
    }
}

#[test_case(&[] => Some("rules[0].rule".to_string()); "no rule")]
#[test_case(&["logs"] => None; "one rule")]
#[test_case(&["throughput", "status_code"] => Some("rules[0].rule".to_string()); "two rules")]
fn test_application_alert_rule_one_of(blocks: &[&str]) -> Option<String> {
    let mut state = application_alert_state();
    let rule = &mut state.rules[0].rule;
    *rule = application_alert_config::RuleBlocks::default();
    for block in blocks {
        match *block {
            "logs" => {
                rule.logs = Some(application_alert_config::LogsRuleState {
                    metric_name: Some("logCount".to_string()),
                    level: Some("ERROR".to_string()),
                    operator: Some("EQUALS".to_string()),
                    ..Default::default()
                })
            }
            "throughput" => {
                rule.throughput = Some(application_alert_config::MetricRuleState {
                    metric_name: Some("calls".to_string()),
                    aggregation: Some("SUM".to_string()),
                })
            }
            "status_code" => {
                rule.status_code = Some(application_alert_config::StatusCodeRuleState {
                    metric_name: Some("http.status".to_string()),
                    status_code_start: Some(500),
                    ..Default::default()
                })
            }
            other => panic!("unknown rule block {other}"),
        }
    }
    rejected_field(application_alert_config::ApplicationAlertConfigResource::new().map_state_to_api(&state))
}

#[test_case(None, &[] => None; "group absent")]
#[test_case(Some(()), &[] => None; "group without blocks")]
#[test_case(Some(()), &["violations_in_period"] => None; "one threshold")]
#[test_case(Some(()), &["request_impact", "violations_in_sequence"] => Some("time_threshold".to_string()); "two thresholds")]
fn test_application_alert_time_threshold_one_of(group: Option<()>, blocks: &[&str]) -> Option<String> {
    let mut state = application_alert_state();
    let mut threshold = group.map(|()| application_alert_config::TimeThresholdState::default());
    for block in blocks {
        let Some(threshold) = threshold.as_mut() else { break };
        match *block {
            "request_impact" => {
                threshold.request_impact = Some(application_alert_config::RequestImpactState {
                    time_window: Some(600_000),
                    requests: Some(10),
                })
            }
            "violations_in_period" => {
                threshold.violations_in_period = Some(application_alert_config::ViolationsInPeriodState {
                    time_window: Some(600_000),
                    violations: Some(3),
                })
            }
            "violations_in_sequence" => {
                threshold.violations_in_sequence = Some(application_alert_config::ViolationsInSequenceState {
                    time_window: Some(600_000),
                })
            }
            other => panic!("unknown time threshold block {other}"),
        }
    }
    state.time_threshold = threshold;

    let handle = application_alert_config::ApplicationAlertConfigResource::new();
    let result = handle.map_state_to_api(&state);
    if let Ok(config) = result.as_ref() {
        assert_eq!(config.time_threshold.is_some(), !blocks.is_empty());
    }
    rejected_field(result)
}

#[test_case(&[] => Some("configuration".to_string()); "no configuration")]
#[test_case(&["http_script"] => None; "one configuration")]
#[test_case(&["http_action", "dns"] => Some("configuration".to_string()); "two configurations")]
fn test_synthetic_test_configuration_one_of(blocks: &[&str]) -> Option<String> {
    let mut state = synthetic_test::SyntheticTestState {
        label: "ping".to_string(),
        locations: BTreeSet::from(["loc-1".to_string()]),
        ..Default::default()
    };
    for block in blocks {
        match *block {
            "http_action" => {
                state.http_action = Some(synthetic_test::HttpActionState {
                    url: Some("https://example.com".to_string()),
                    ..Default::default()
                })
            }
            "http_script" => {
                state.http_script = Some(synthetic_test::HttpScriptState {
                    script: Some("await $http.get('https://example.com');".to_string()),
                    ..Default::default()
                })
            }
            "dns" => {
                state.dns = Some(synthetic_test::DnsState {
                    lookup: Some("example.com".to_string()),
                    server: Some("1.1.1.1".to_string()),
                    ..Default::default()
                })
            }
            other => panic!("unknown configuration block {other}"),
        }
    }
    rejected_field(synthetic_test::SyntheticTestResource::new().map_state_to_api(&state))
}

#[test_case(&[] => Some("time_threshold".to_string()); "no threshold")]
#[test_case(&["violations_in_period"] => None; "one threshold")]
#[test_case(&["violations_in_sequence", "violations_in_period"] => Some("time_threshold".to_string()); "two thresholds")]
fn test_website_alert_time_threshold_one_of(blocks: &[&str]) -> Option<String> {
    let mut state = website_alert_state();
    state.time_threshold = website_alert_config::TimeThresholdState::default();
    for block in blocks {
        match *block {
            "violations_in_sequence" => {
                state.time_threshold.violations_in_sequence = Some(website_alert_config::ViolationsInSequenceState {
                    time_window: Some(600_000),
                })
            }
            "violations_in_period" => {
                state.time_threshold.violations_in_period = Some(website_alert_config::ViolationsInPeriodState {
                    time_window: Some(600_000),
                    violations: Some(2),
                })
            }
            other => panic!("unknown time threshold block {other}"),
        }
    }
    rejected_field(website_alert_config::WebsiteAlertConfigResource::new().map_state_to_api(&state))
}

#[test]
fn test_website_alert_partially_filled_rule_block_counts_as_set() {
    // throughput carries only an aggregation; it is still a second choice
    let handle = website_alert_config::WebsiteAlertConfigResource::new();
    let mut state = website_alert_state();
    state.rule = website_alert_config::RuleBlocks {
        throughput: Some(website_alert_config::MetricRuleState {
            metric_name: None,
            aggregation: Some("SUM".to_string()),
        }),
        slowness: Some(website_alert_config::MetricRuleState {
            metric_name: Some("onLoadTime".to_string()),
            aggregation: None,
        }),
        ..Default::default()
    };
    assert_eq!(invalid_field(&handle.map_state_to_api(&state).unwrap_err()), "rule");

    // a block whose attributes are all null is treated as absent
    state.rule.throughput = Some(website_alert_config::MetricRuleState::default());
    let config = handle.map_state_to_api(&state).unwrap();
    assert_eq!(config.rule.alert_type, "slowness");
}

// ============================================================================
// API -> state -> API
// ============================================================================

fn slo_api(
    entity: crate::restapi::slo_config::SloEntity,
    indicator: crate::restapi::slo_config::SloIndicator,
    time_window: crate::restapi::slo_config::SloTimeWindow,
) -> crate::restapi::SloConfig {
    crate::restapi::SloConfig {
        id: "slo-1".to_string(),
        name: "checkout".to_string(),
        target: 0.995,
        tags: vec!["team-a".to_string(), "tier-1".to_string()],
        entity,
        indicator,
        time_window,
        rbac_tags: vec![crate::restapi::slo_config::RbacTag {
            display_name: "Team A".to_string(),
            id: "rbac-1".to_string(),
        }],
    }
}

#[test_case(
    crate::restapi::slo_config::SloEntity {
        kind: "application".to_string(),
        application_id: Some("app-1".to_string()),
        boundary_scope: Some("INBOUND".to_string()),
        service_id: Some("svc-1".to_string()),
        include_internal: Some(false),
        include_synthetic: Some(true),
        ..Default::default()
    },
    crate::restapi::slo_config::SloIndicator {
        blueprint: "latency".to_string(),
        kind: Some("timeBased".to_string()),
        threshold: Some(250.0),
        aggregation: Some("P90".to_string()),
        ..Default::default()
    },
    crate::restapi::slo_config::SloTimeWindow {
        kind: "rolling".to_string(),
        duration: 7,
        duration_unit: "day".to_string(),
        timezone: Some("UTC".to_string()),
        start_timestamp: None,
    };
    "application latency rolling"
)]
#[test_case(
    crate::restapi::slo_config::SloEntity {
        kind: "website".to_string(),
        website_id: Some("web-1".to_string()),
        beacon_type: Some("pageLoad".to_string()),
        ..Default::default()
    },
    crate::restapi::slo_config::SloIndicator {
        blueprint: "availability".to_string(),
        kind: Some("eventBased".to_string()),
        ..Default::default()
    },
    crate::restapi::slo_config::SloTimeWindow {
        kind: "fixed".to_string(),
        duration: 1,
        duration_unit: "month".to_string(),
        timezone: None,
        start_timestamp: Some(1_700_000_000_000.0),
    };
    "website availability fixed"
)]
#[test_case(
    crate::restapi::slo_config::SloEntity {
        kind: "synthetic".to_string(),
        synthetic_test_ids: Some(vec![json!("syn-1"), json!("syn-2")]),
        ..Default::default()
    },
    crate::restapi::slo_config::SloIndicator {
        blueprint: "traffic".to_string(),
        traffic_type: Some("erroneous".to_string()),
        threshold: Some(10.0),
        operator: Some("<=".to_string()),
        ..Default::default()
    },
    crate::restapi::slo_config::SloTimeWindow {
        kind: "rolling".to_string(),
        duration: 4,
        duration_unit: "week".to_string(),
        timezone: None,
        start_timestamp: None,
    };
    "synthetic traffic rolling"
)]
fn test_slo_config_api_round_trip(
    entity: crate::restapi::slo_config::SloEntity,
    indicator: crate::restapi::slo_config::SloIndicator,
    time_window: crate::restapi::slo_config::SloTimeWindow,
) {
    let handle = slo_config::SloConfigResource::new();
    let config = slo_api(entity, indicator, time_window);

    let state = handle.update_state(&config, None).unwrap();
    assert_eq!(handle.map_state_to_api(&state).unwrap(), config);
}

#[test]
fn test_application_alert_config_api_round_trip() {
    use crate::restapi::application_alert_config::{
        ApplicationAlertRule, ApplicationAlertTimeThreshold, IncludedApplication, IncludedEndpoint,
        IncludedService,
    };

    let endpoint = IncludedEndpoint {
        endpoint_id: "ep-1".to_string(),
        inclusive: true,
    };
    let service = IncludedService {
        service_id: "svc-1".to_string(),
        inclusive: false,
        endpoints: BTreeMap::from([("ep-1".to_string(), endpoint)]),
    };
    let application = IncludedApplication {
        application_id: "app-1".to_string(),
        inclusive: true,
        services: BTreeMap::from([("svc-1".to_string(), service)]),
    };
    let config = crate::restapi::ApplicationAlertConfig {
        id: "alert-1".to_string(),
        name: "5xx on checkout".to_string(),
        description: "server errors".to_string(),
        severity: Some(10),
        triggering: true,
        applications: BTreeMap::from([("app-1".to_string(), application)]),
        boundary_scope: "INBOUND".to_string(),
        tag_filter_expression: None,
        include_internal: false,
        include_synthetic: true,
        evaluation_type: "PER_AP_SERVICE".to_string(),
        alert_channels: BTreeMap::from([
            ("CRITICAL".to_string(), vec!["ch-2".to_string()]),
            ("WARNING".to_string(), vec!["ch-1".to_string()]),
        ]),
        granularity: 300_000,
        grace_period: Some(600_000),
        rules: vec![crate::restapi::RuleWithThreshold {
            threshold_operator: ">=".to_string(),
            rule: ApplicationAlertRule {
                alert_type: "statusCode".to_string(),
                metric_name: "http.status".to_string(),
                aggregation: Some("SUM".to_string()),
                status_code_start: Some(500),
                status_code_end: Some(599),
                ..Default::default()
            },
            thresholds: BTreeMap::from([
                (Severity::Warning, crate::restapi::Threshold::static_threshold(">=", 5.0)),
                (Severity::Critical, crate::restapi::Threshold::static_threshold(">=", 20.0)),
            ]),
        }],
        time_threshold: Some(ApplicationAlertTimeThreshold::RequestImpact {
            time_window: 600_000,
            requests: 5,
        }),
        custom_payload_fields: Vec::new(),
    };

    let handle = application_alert_config::ApplicationAlertConfigResource::new();
    let state = handle.update_state(&config, None).unwrap();
    assert_eq!(state.severity.as_deref(), Some("critical"));
    assert_eq!(handle.map_state_to_api(&state).unwrap(), config);
}

#[test]
fn test_log_alert_config_api_round_trip() {
    use crate::restapi::log_alert_config::{GroupByTag, LogAlertRule, LogTimeThreshold};

    let handle = log_alert_config::LogAlertConfigResource::new();
    let seeded = handle.map_state_to_api(&log_alert_state()).unwrap();
    let config = crate::restapi::LogAlertConfig {
        id: "log-1".to_string(),
        alert_channels: BTreeMap::from([("WARNING".to_string(), vec!["ch-1".to_string()])]),
        granularity: 300_000,
        time_threshold: Some(LogTimeThreshold::ViolationsInSequence { time_window: 600_000 }),
        grace_period: Some(120_000),
        rules: vec![crate::restapi::RuleWithThreshold {
            threshold_operator: ">".to_string(),
            rule: LogAlertRule {
                alert_type: "logCount".to_string(),
                metric_name: "log.count".to_string(),
                aggregation: Some("SUM".to_string()),
            },
            thresholds: BTreeMap::from([(
                Severity::Critical,
                crate::restapi::Threshold::static_threshold(">", 100.0),
            )]),
        }],
        group_by: vec![GroupByTag {
            tag_name: "log.level".to_string(),
            key: None,
        }],
        ..seeded
    };

    let state = handle.update_state(&config, None).unwrap();
    assert_eq!(handle.map_state_to_api(&state).unwrap(), config);
}
