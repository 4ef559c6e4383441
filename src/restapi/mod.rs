//! Instana REST API module
//!
//! Typed entities and the generic resource protocol that moves them over the
//! transport.
//!
//! # Overview
//!
//! - [`InstanaDataObject`] is the identity contract every entity implements.
//! - [`RestResource`] is the CRUD protocol; [`DefaultRestResource`] drives it
//!   from a create/update verb policy.
//! - [`InstanaApi`] hands out one configured resource per entity.
//!
//! Entity models live in their own submodules together with the enumerated
//! values the API accepts for them.

mod api;
mod object;
mod resource;

pub mod alerting_channel;
pub mod alerting_config;
pub mod api_token;
pub mod application_alert_config;
pub mod application_config;
pub mod automation;
pub mod custom_dashboard;
pub mod event_specification;
pub mod group;
pub mod host_agent;
pub mod infra_alert_config;
pub mod log_alert_config;
pub mod sli_config;
pub mod slo_alert_config;
pub mod slo_config;
pub mod slo_correction_config;
pub mod synthetic_alert_config;
pub mod tag_filter;
pub mod threshold;
pub mod website_alert_config;
pub mod website_monitoring_config;

pub use api::*;
pub use object::{CustomPayloadFieldsAware, InstanaDataObject};
pub use resource::{
    CreateVerb, DefaultRestResource, ReadOnlyRestResource, RestResource, UpdateVerb,
    WebsiteMonitoringConfigRestResource,
};

pub use alerting_channel::AlertingChannel;
pub use alerting_config::AlertingConfiguration;
pub use api_token::ApiToken;
pub use application_alert_config::ApplicationAlertConfig;
pub use application_config::ApplicationConfig;
pub use automation::{AutomationAction, AutomationPolicy};
pub use custom_dashboard::CustomDashboard;
pub use event_specification::{BuiltinEventSpecification, CustomEventSpecification};
pub use group::Group;
pub use host_agent::HostAgent;
pub use infra_alert_config::InfraAlertConfig;
pub use log_alert_config::LogAlertConfig;
pub use sli_config::SliConfig;
pub use slo_alert_config::SloAlertConfig;
pub use slo_config::SloConfig;
pub use slo_correction_config::SloCorrectionConfig;
pub use synthetic_alert_config::SyntheticAlertConfig;
pub use synthetic_test::{SyntheticLocation, SyntheticTest};
pub use tag_filter::{
    LogicalOperator, TagFilter, TagFilterElement, TagFilterEntity, TagFilterOperator,
};
pub use threshold::{RuleWithThreshold, Seasonality, SeverityThresholds, Threshold};
pub use website_alert_config::WebsiteAlertConfig;
pub use website_monitoring_config::WebsiteMonitoringConfig;

#[cfg(test)]
mod tests;
