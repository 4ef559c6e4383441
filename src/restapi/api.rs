//! Instana API facade
//!
//! One accessor per entity. Each accessor returns the resource configured
//! with the entity's base path, verb policy and codec.

use super::alerting_channel::AlertingChannel;
use super::alerting_config::AlertingConfiguration;
use super::api_token::ApiToken;
use super::application_alert_config::ApplicationAlertConfig;
use super::application_config::ApplicationConfig;
use super::automation::{AutomationAction, AutomationPolicy};
use super::custom_dashboard::CustomDashboard;
use super::event_specification::{BuiltinEventSpecification, CustomEventSpecification};
use super::group::Group;
use super::host_agent::HostAgent;
use super::infra_alert_config::InfraAlertConfig;
use super::log_alert_config::LogAlertConfig;
use super::object::InstanaDataObject;
use super::resource::{
    DefaultRestResource, ReadOnlyRestResource, RestResource, WebsiteMonitoringConfigRestResource,
};
use super::sli_config::SliConfig;
use super::slo_alert_config::SloAlertConfig;
use super::slo_config::SloConfig;
use super::slo_correction_config::SloCorrectionConfig;
use super::synthetic_alert_config::SyntheticAlertConfig;
use super::synthetic_test::{SyntheticLocation, SyntheticTest};
use super::website_alert_config::WebsiteAlertConfig;
use super::website_monitoring_config::WebsiteMonitoringConfig;
use crate::codec::{CustomPayloadFieldsCodec, DefaultJsonCodec, JsonCodec};
use crate::http::RestClient;
use crate::restapi::CustomPayloadFieldsAware;
use std::sync::Arc;

// ============================================================================
// Resource Paths
// ============================================================================

pub const API_TOKENS_PATH: &str = "/api/settings/api-tokens";
pub const APPLICATION_CONFIGS_PATH: &str = "/api/application-monitoring/settings/application";
pub const APPLICATION_ALERT_CONFIGS_PATH: &str = "/api/events/settings/application-alert-configs";
pub const GLOBAL_APPLICATION_ALERT_CONFIGS_PATH: &str =
    "/api/events/settings/global-alert-configs/applications";
pub const WEBSITE_ALERT_CONFIGS_PATH: &str = "/api/events/settings/website-alert-configs";
pub const INFRA_ALERT_CONFIGS_PATH: &str = "/api/events/settings/infra-alert-configs";
pub const LOG_ALERT_CONFIGS_PATH: &str = "/api/events/settings/global-alert-configs/logs";
pub const ALERTING_CONFIGS_PATH: &str = "/api/events/settings/alerts";
pub const SYNTHETIC_ALERT_CONFIGS_PATH: &str = "/api/events/settings/global-alert-configs/synthetics";
pub const SLO_ALERT_CONFIGS_PATH: &str = "/api/events/settings/global-alert-configs/service-levels";
pub const SLI_CONFIGS_PATH: &str = "/api/settings/v2/sli";
pub const SLO_CONFIGS_PATH: &str = "/api/settings/slo";
pub const SLO_CORRECTION_CONFIGS_PATH: &str = "/api/settings/correction";
pub const CUSTOM_EVENT_SPECIFICATIONS_PATH: &str = "/api/events/settings/event-specifications/custom";
pub const BUILTIN_EVENT_SPECIFICATIONS_PATH: &str =
    "/api/events/settings/event-specifications/built-in";
pub const ALERTING_CHANNELS_PATH: &str = "/api/events/settings/alerting-channels";
pub const SYNTHETIC_TESTS_PATH: &str = "/api/synthetics/settings/tests";
pub const SYNTHETIC_LOCATIONS_PATH: &str = "/api/synthetics/settings/locations";
pub const WEBSITE_MONITORING_CONFIGS_PATH: &str = "/api/website-monitoring/config";
pub const AUTOMATION_ACTIONS_PATH: &str = "/api/automation/actions";
pub const AUTOMATION_POLICIES_PATH: &str = "/api/automation/policies";
pub const GROUPS_PATH: &str = "/api/settings/rbac/groups";
pub const CUSTOM_DASHBOARDS_PATH: &str = "/api/custom-dashboard";
pub const HOST_AGENTS_PATH: &str = "/api/host-agent";

// ============================================================================
// Facade
// ============================================================================

/// Entry point to every Instana resource
#[derive(Clone)]
pub struct InstanaApi {
    client: Arc<dyn RestClient>,
}

impl std::fmt::Debug for InstanaApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanaApi").finish_non_exhaustive()
    }
}

fn default_codec<T: InstanaDataObject>() -> Arc<dyn JsonCodec<T>> {
    Arc::new(DefaultJsonCodec::<T>::new())
}

fn payload_codec<T: InstanaDataObject + CustomPayloadFieldsAware>() -> Arc<dyn JsonCodec<T>> {
    Arc::new(CustomPayloadFieldsCodec::<DefaultJsonCodec<T>>::wrap_default())
}

impl InstanaApi {
    /// Create the facade over a transport
    pub fn new(client: Arc<dyn RestClient>) -> Self {
        Self { client }
    }

    /// Underlying transport
    pub fn client(&self) -> Arc<dyn RestClient> {
        Arc::clone(&self.client)
    }

    fn post_put<T: InstanaDataObject>(&self, name: &'static str, path: &'static str) -> Arc<dyn RestResource<T>> {
        Arc::new(DefaultRestResource::create_post_update_put(
            name,
            path,
            default_codec(),
            self.client(),
        ))
    }

    fn post_post_with_payload_fields<T>(
        &self,
        name: &'static str,
        path: &'static str,
    ) -> Arc<dyn RestResource<T>>
    where
        T: InstanaDataObject + CustomPayloadFieldsAware,
    {
        Arc::new(DefaultRestResource::create_post_update_post(
            name,
            path,
            payload_codec(),
            self.client(),
        ))
    }

    pub fn api_tokens(&self) -> Arc<dyn RestResource<ApiToken>> {
        self.post_put("instana_api_token", API_TOKENS_PATH)
    }

    pub fn application_configs(&self) -> Arc<dyn RestResource<ApplicationConfig>> {
        self.post_put("instana_application_config", APPLICATION_CONFIGS_PATH)
    }

    pub fn application_alert_configs(&self) -> Arc<dyn RestResource<ApplicationAlertConfig>> {
        self.post_post_with_payload_fields(
            "instana_application_alert_config",
            APPLICATION_ALERT_CONFIGS_PATH,
        )
    }

    pub fn global_application_alert_configs(&self) -> Arc<dyn RestResource<ApplicationAlertConfig>> {
        self.post_post_with_payload_fields(
            "instana_global_application_alert_config",
            GLOBAL_APPLICATION_ALERT_CONFIGS_PATH,
        )
    }

    pub fn website_alert_configs(&self) -> Arc<dyn RestResource<WebsiteAlertConfig>> {
        self.post_post_with_payload_fields("instana_website_alert_config", WEBSITE_ALERT_CONFIGS_PATH)
    }

    pub fn infra_alert_configs(&self) -> Arc<dyn RestResource<InfraAlertConfig>> {
        self.post_post_with_payload_fields("instana_infra_alert_config", INFRA_ALERT_CONFIGS_PATH)
    }

    pub fn log_alert_configs(&self) -> Arc<dyn RestResource<LogAlertConfig>> {
        self.post_post_with_payload_fields("instana_log_alert_config", LOG_ALERT_CONFIGS_PATH)
    }

    /// Legacy alerting configurations; ids are assigned client-side
    pub fn alerting_configs(&self) -> Arc<dyn RestResource<AlertingConfiguration>> {
        Arc::new(DefaultRestResource::create_put_update_put(
            "instana_alerting_config",
            ALERTING_CONFIGS_PATH,
            payload_codec(),
            self.client(),
        ))
    }

    pub fn synthetic_alert_configs(&self) -> Arc<dyn RestResource<SyntheticAlertConfig>> {
        self.post_post_with_payload_fields(
            "instana_synthetic_alert_config",
            SYNTHETIC_ALERT_CONFIGS_PATH,
        )
    }

    pub fn slo_alert_configs(&self) -> Arc<dyn RestResource<SloAlertConfig>> {
        self.post_post_with_payload_fields("instana_slo_alert_config", SLO_ALERT_CONFIGS_PATH)
    }

    pub fn sli_configs(&self) -> Arc<dyn RestResource<SliConfig>> {
        Arc::new(DefaultRestResource::create_post_update_not_supported(
            "instana_sli_config",
            SLI_CONFIGS_PATH,
            default_codec(),
            self.client(),
        ))
    }

    pub fn slo_configs(&self) -> Arc<dyn RestResource<SloConfig>> {
        self.post_put("instana_slo_config", SLO_CONFIGS_PATH)
    }

    pub fn slo_correction_configs(&self) -> Arc<dyn RestResource<SloCorrectionConfig>> {
        self.post_put("instana_slo_correction_config", SLO_CORRECTION_CONFIGS_PATH)
    }

    pub fn custom_event_specifications(&self) -> Arc<dyn RestResource<CustomEventSpecification>> {
        Arc::new(DefaultRestResource::create_put_update_put(
            "instana_custom_event_specification",
            CUSTOM_EVENT_SPECIFICATIONS_PATH,
            default_codec(),
            self.client(),
        ))
    }

    pub fn builtin_event_specifications(&self) -> ReadOnlyRestResource<BuiltinEventSpecification> {
        ReadOnlyRestResource::new(
            BUILTIN_EVENT_SPECIFICATIONS_PATH,
            default_codec(),
            self.client(),
        )
    }

    pub fn alerting_channels(&self) -> Arc<dyn RestResource<AlertingChannel>> {
        Arc::new(DefaultRestResource::create_put_update_put(
            "instana_alerting_channel",
            ALERTING_CHANNELS_PATH,
            default_codec(),
            self.client(),
        ))
    }

    pub fn synthetic_tests(&self) -> Arc<dyn RestResource<SyntheticTest>> {
        Arc::new(DefaultRestResource::create_post_update_post(
            "instana_synthetic_test",
            SYNTHETIC_TESTS_PATH,
            default_codec(),
            self.client(),
        ))
    }

    pub fn synthetic_locations(&self) -> ReadOnlyRestResource<SyntheticLocation> {
        ReadOnlyRestResource::new(SYNTHETIC_LOCATIONS_PATH, default_codec(), self.client())
    }

    pub fn website_monitoring_configs(&self) -> Arc<dyn RestResource<WebsiteMonitoringConfig>> {
        Arc::new(WebsiteMonitoringConfigRestResource::new(
            WEBSITE_MONITORING_CONFIGS_PATH,
            self.client(),
        ))
    }

    pub fn automation_actions(&self) -> Arc<dyn RestResource<AutomationAction>> {
        self.post_put("instana_automation_action", AUTOMATION_ACTIONS_PATH)
    }

    pub fn automation_policies(&self) -> Arc<dyn RestResource<AutomationPolicy>> {
        self.post_put("instana_automation_policy", AUTOMATION_POLICIES_PATH)
    }

    pub fn groups(&self) -> Arc<dyn RestResource<Group>> {
        self.post_put("instana_rbac_group", GROUPS_PATH)
    }

    pub fn custom_dashboards(&self) -> Arc<dyn RestResource<CustomDashboard>> {
        self.post_put("instana_custom_dashboard", CUSTOM_DASHBOARDS_PATH)
    }

    /// Host agents; the list endpoint wraps results in `{"items": [...]}`
    pub fn host_agents(&self) -> ReadOnlyRestResource<HostAgent> {
        ReadOnlyRestResource::new(HOST_AGENTS_PATH, default_codec(), self.client())
    }
}
