//! Managed resources
//!
//! Each `instana_*` resource is a [`ResourceHandle`]: a state schema, the
//! REST resource it talks to and the mappers between the two. The
//! [`ResourceDriver`] runs the lifecycle for any handle, and
//! [`all_resources`] lists every resource the provider serves.

mod driver;
mod handle;

pub mod alerting_channel;
pub mod alerting_config;
pub mod api_token;
pub mod application_alert_config;
pub mod application_config;
pub mod automation_action;
pub mod automation_policy;
pub mod custom_dashboard;
pub mod custom_event_specification;
pub mod infra_alert_config;
pub mod log_alert_config;
pub mod rbac_group;
pub mod sli_config;
pub mod slo_alert_config;
pub mod slo_config;
pub mod slo_correction_config;
pub mod synthetic_alert_config;
pub mod website_alert_config;
pub mod website_monitoring_config;

pub use driver::{DynResource, ResourceDriver};
pub use handle::{ResourceHandle, ResourceMetadata, StateModel};

use crate::restapi::InstanaApi;
use std::sync::Arc;

fn driver<H: ResourceHandle>(handle: H, api: &InstanaApi) -> Arc<dyn DynResource> {
    Arc::new(ResourceDriver::new(handle, api))
}

/// Every resource the provider serves, bound to `api`
pub fn all_resources(api: &InstanaApi) -> Vec<Arc<dyn DynResource>> {
    vec![
        driver(alerting_channel::AlertingChannelResource::new(), api),
        driver(alerting_config::AlertingConfigResource::new(), api),
        driver(api_token::ApiTokenResource::new(), api),
        driver(application_alert_config::ApplicationAlertConfigResource::new(), api),
        driver(application_alert_config::ApplicationAlertConfigResource::global(), api),
        driver(application_config::ApplicationConfigResource::new(), api),
        driver(automation_action::AutomationActionResource::new(), api),
        driver(automation_policy::AutomationPolicyResource::new(), api),
        driver(custom_dashboard::CustomDashboardResource::new(), api),
        driver(custom_event_specification::CustomEventSpecificationResource::new(), api),
        driver(infra_alert_config::InfraAlertConfigResource::new(), api),
        driver(log_alert_config::LogAlertConfigResource::new(), api),
        driver(rbac_group::RbacGroupResource::new(), api),
        driver(sli_config::SliConfigResource::new(), api),
        driver(slo_alert_config::SloAlertConfigResource::new(), api),
        driver(slo_config::SloConfigResource::new(), api),
        driver(slo_correction_config::SloCorrectionConfigResource::new(), api),
        driver(synthetic_alert_config::SyntheticAlertConfigResource::new(), api),
        driver(synthetic_test::SyntheticTestResource::new(), api),
        driver(website_alert_config::WebsiteAlertConfigResource::new(), api),
        driver(website_monitoring_config::WebsiteMonitoringConfigResource::new(), api),
    ]
}

#[cfg(test)]
mod tests;
