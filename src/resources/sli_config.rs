//! `instana_sli_config`
//!
//! SLI configs cannot be updated in place; every change replaces them.

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{require, require_str, tag_filter_from_api, tag_filter_to_api, OneOf};
use crate::restapi::sli_config::{
    MetricConfiguration, SliEntity, SLI_TYPE_APPLICATION, SLI_TYPE_AVAILABILITY,
    SLI_TYPE_WEBSITE_EVENT_BASED, SLI_TYPE_WEBSITE_TIME_BASED,
};
use crate::restapi::{InstanaApi, RestResource, SliConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_sli_config";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SliConfigState {
    pub id: String,
    pub name: String,
    pub initial_evaluation_timestamp: i64,
    pub metric_configuration: Option<MetricConfigurationState>,
    pub sli_entity: SliEntityState,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricConfigurationState {
    pub metric_name: String,
    pub aggregation: String,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SliEntityState {
    pub application_time_based: Option<ApplicationTimeBasedState>,
    pub application_event_based: Option<ApplicationEventBasedState>,
    pub website_event_based: Option<WebsiteEventBasedState>,
    pub website_time_based: Option<WebsiteTimeBasedState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationTimeBasedState {
    pub application_id: Option<String>,
    pub service_id: Option<String>,
    pub endpoint_id: Option<String>,
    pub boundary_scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationEventBasedState {
    pub application_id: Option<String>,
    pub boundary_scope: Option<String>,
    pub good_event_filter_expression: Option<String>,
    pub bad_event_filter_expression: Option<String>,
    pub include_internal: Option<bool>,
    pub include_synthetic: Option<bool>,
    pub service_id: Option<String>,
    pub endpoint_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteEventBasedState {
    pub website_id: Option<String>,
    pub good_event_filter_expression: Option<String>,
    pub bad_event_filter_expression: Option<String>,
    pub beacon_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteTimeBasedState {
    pub website_id: Option<String>,
    pub filter_expression: Option<String>,
    pub beacon_type: Option<String>,
}

state_with_id!(SliConfigState);

fn entity_to_api(state: &SliEntityState) -> Result<SliEntity> {
    OneOf::new("sli_entity")
        .variant("application_time_based", state.application_time_based.as_ref(), |e| {
            let field = "sli_entity.application_time_based";
            Ok(SliEntity {
                sli_type: SLI_TYPE_APPLICATION.to_string(),
                application_id: Some(require(&format!("{field}.application_id"), e.application_id.clone())?),
                service_id: e.service_id.clone(),
                endpoint_id: e.endpoint_id.clone(),
                boundary_scope: Some(require(&format!("{field}.boundary_scope"), e.boundary_scope.clone())?),
                ..Default::default()
            })
        })
        .variant("application_event_based", state.application_event_based.as_ref(), |e| {
            let field = "sli_entity.application_event_based";
            Ok(SliEntity {
                sli_type: SLI_TYPE_AVAILABILITY.to_string(),
                application_id: Some(require(&format!("{field}.application_id"), e.application_id.clone())?),
                boundary_scope: Some(require(&format!("{field}.boundary_scope"), e.boundary_scope.clone())?),
                good_event_filter_expression: tag_filter_to_api(
                    &format!("{field}.good_event_filter_expression"),
                    e.good_event_filter_expression.as_deref(),
                )?,
                bad_event_filter_expression: tag_filter_to_api(
                    &format!("{field}.bad_event_filter_expression"),
                    e.bad_event_filter_expression.as_deref(),
                )?,
                include_internal: e.include_internal,
                include_synthetic: e.include_synthetic,
                service_id: e.service_id.clone(),
                endpoint_id: e.endpoint_id.clone(),
                ..Default::default()
            })
        })
        .variant("website_event_based", state.website_event_based.as_ref(), |e| {
            let field = "sli_entity.website_event_based";
            Ok(SliEntity {
                sli_type: SLI_TYPE_WEBSITE_EVENT_BASED.to_string(),
                website_id: Some(require(&format!("{field}.website_id"), e.website_id.clone())?),
                good_event_filter_expression: tag_filter_to_api(
                    &format!("{field}.good_event_filter_expression"),
                    e.good_event_filter_expression.as_deref(),
                )?,
                bad_event_filter_expression: tag_filter_to_api(
                    &format!("{field}.bad_event_filter_expression"),
                    e.bad_event_filter_expression.as_deref(),
                )?,
                beacon_type: Some(require(&format!("{field}.beacon_type"), e.beacon_type.clone())?),
                ..Default::default()
            })
        })
        .variant("website_time_based", state.website_time_based.as_ref(), |e| {
            let field = "sli_entity.website_time_based";
            Ok(SliEntity {
                sli_type: SLI_TYPE_WEBSITE_TIME_BASED.to_string(),
                website_id: Some(require(&format!("{field}.website_id"), e.website_id.clone())?),
                filter_expression: tag_filter_to_api(
                    &format!("{field}.filter_expression"),
                    e.filter_expression.as_deref(),
                )?,
                beacon_type: Some(require(&format!("{field}.beacon_type"), e.beacon_type.clone())?),
                ..Default::default()
            })
        })
        .required()
}

fn entity_from_api(entity: &SliEntity) -> Result<SliEntityState> {
    let mut state = SliEntityState::default();
    match entity.sli_type.as_str() {
        SLI_TYPE_APPLICATION => {
            state.application_time_based = Some(ApplicationTimeBasedState {
                application_id: entity.application_id.clone(),
                service_id: entity.service_id.clone(),
                endpoint_id: entity.endpoint_id.clone(),
                boundary_scope: entity.boundary_scope.clone(),
            })
        }
        SLI_TYPE_AVAILABILITY => {
            state.application_event_based = Some(ApplicationEventBasedState {
                application_id: entity.application_id.clone(),
                boundary_scope: entity.boundary_scope.clone(),
                good_event_filter_expression: tag_filter_from_api(
                    entity.good_event_filter_expression.as_ref(),
                )?,
                bad_event_filter_expression: tag_filter_from_api(
                    entity.bad_event_filter_expression.as_ref(),
                )?,
                include_internal: entity.include_internal,
                include_synthetic: entity.include_synthetic,
                service_id: entity.service_id.clone(),
                endpoint_id: entity.endpoint_id.clone(),
            })
        }
        SLI_TYPE_WEBSITE_EVENT_BASED => {
            state.website_event_based = Some(WebsiteEventBasedState {
                website_id: entity.website_id.clone(),
                good_event_filter_expression: tag_filter_from_api(
                    entity.good_event_filter_expression.as_ref(),
                )?,
                bad_event_filter_expression: tag_filter_from_api(
                    entity.bad_event_filter_expression.as_ref(),
                )?,
                beacon_type: entity.beacon_type.clone(),
            })
        }
        SLI_TYPE_WEBSITE_TIME_BASED => {
            state.website_time_based = Some(WebsiteTimeBasedState {
                website_id: entity.website_id.clone(),
                filter_expression: tag_filter_from_api(entity.filter_expression.as_ref())?,
                beacon_type: entity.beacon_type.clone(),
            })
        }
        other => {
            return Err(Error::malformed(format!("unsupported sli type '{other}'")));
        }
    }
    Ok(state)
}

pub struct SliConfigResource {
    metadata: ResourceMetadata,
}

impl SliConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 1).create_only(),
        }
    }
}

impl Default for SliConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for SliConfigResource {
    type State = SliConfigState;
    type Api = SliConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<SliConfig>> {
        api.sli_configs()
    }

    fn map_state_to_api(&self, state: &SliConfigState) -> Result<SliConfig> {
        Ok(SliConfig {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            initial_evaluation_timestamp: state.initial_evaluation_timestamp,
            metric_configuration: state.metric_configuration.as_ref().map(|m| MetricConfiguration {
                metric_name: m.metric_name.clone(),
                aggregation: m.aggregation.clone(),
                threshold: m.threshold,
            }),
            sli_entity: entity_to_api(&state.sli_entity)?,
        })
    }

    fn update_state(&self, config: &SliConfig, _previous: Option<&SliConfigState>) -> Result<SliConfigState> {
        Ok(SliConfigState {
            id: config.id.clone(),
            name: config.name.clone(),
            initial_evaluation_timestamp: config.initial_evaluation_timestamp,
            metric_configuration: config
                .metric_configuration
                .as_ref()
                .map(|m| MetricConfigurationState {
                    metric_name: m.metric_name.clone(),
                    aggregation: m.aggregation.clone(),
                    threshold: m.threshold,
                }),
            sli_entity: entity_from_api(&config.sli_entity)?,
        })
    }
}
