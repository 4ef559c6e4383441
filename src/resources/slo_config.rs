//! `instana_slo_config`
//!
//! Three block groups: the entity the objective applies to, the indicator
//! measured on it and the time window it is evaluated over.

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{require, require_str, tag_filter_from_api, tag_filter_to_api, OneOf};
use crate::restapi::slo_config::{
    RbacTag, SloEntity, SloIndicator, SloTimeWindow, SLO_BLUEPRINT_AVAILABILITY,
    SLO_BLUEPRINT_CUSTOM, SLO_BLUEPRINT_LATENCY, SLO_BLUEPRINT_TRAFFIC, SLO_ENTITY_APPLICATION,
    SLO_ENTITY_INFRASTRUCTURE, SLO_ENTITY_SYNTHETIC, SLO_ENTITY_WEBSITE,
    SLO_MEASUREMENT_EVENT_BASED, SLO_MEASUREMENT_TIME_BASED, SLO_TIME_WINDOW_FIXED,
    SLO_TIME_WINDOW_ROLLING,
};
use crate::restapi::{InstanaApi, RestResource, SloConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_slo_config";

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SloConfigState {
    pub id: String,
    pub name: String,
    pub target: f64,
    pub tags: BTreeSet<String>,
    pub entity: EntityState,
    pub indicator: IndicatorState,
    pub time_window: TimeWindowState,
    pub rbac_tags: Option<Vec<RbacTagState>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacTagState {
    pub display_name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityState {
    pub application: Option<ApplicationEntityState>,
    pub website: Option<WebsiteEntityState>,
    pub synthetic: Option<SyntheticEntityState>,
    pub infrastructure: Option<InfrastructureEntityState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationEntityState {
    pub application_id: Option<String>,
    pub boundary_scope: Option<String>,
    pub service_id: Option<String>,
    pub endpoint_id: Option<String>,
    pub include_internal: Option<bool>,
    pub include_synthetic: Option<bool>,
    pub filter_expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteEntityState {
    pub website_id: Option<String>,
    pub beacon_type: Option<String>,
    pub filter_expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticEntityState {
    pub synthetic_test_ids: Option<BTreeSet<String>>,
    pub filter_expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureEntityState {
    pub infra_type: Option<String>,
    pub filter_expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorState {
    pub time_based_latency: Option<ThresholdIndicatorState>,
    pub event_based_latency: Option<EventBasedLatencyState>,
    pub time_based_availability: Option<ThresholdIndicatorState>,
    pub event_based_availability: Option<EventBasedAvailabilityState>,
    pub traffic: Option<TrafficIndicatorState>,
    pub custom: Option<CustomIndicatorState>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdIndicatorState {
    pub threshold: Option<f64>,
    pub aggregation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBasedLatencyState {
    pub threshold: Option<f64>,
}

/// Marker block without attributes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventBasedAvailabilityState {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficIndicatorState {
    pub traffic_type: Option<String>,
    pub threshold: Option<f64>,
    pub operator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomIndicatorState {
    pub good_event_filter_expression: Option<String>,
    pub bad_event_filter_expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeWindowState {
    pub rolling: Option<RollingWindowState>,
    pub fixed: Option<FixedWindowState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingWindowState {
    pub duration: Option<i64>,
    pub duration_unit: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedWindowState {
    pub duration: Option<i64>,
    pub duration_unit: Option<String>,
    pub timezone: Option<String>,
    pub start_timestamp: Option<f64>,
}

state_with_id!(SloConfigState);

// ============================================================================
// Entity
// ============================================================================

fn entity_to_api(state: &EntityState) -> Result<SloEntity> {
    OneOf::new("entity")
        .variant("application", state.application.as_ref(), |e| {
            let field = "entity.application";
            Ok(SloEntity {
                kind: SLO_ENTITY_APPLICATION.to_string(),
                application_id: Some(require(&format!("{field}.application_id"), e.application_id.clone())?),
                boundary_scope: Some(require(&format!("{field}.boundary_scope"), e.boundary_scope.clone())?),
                service_id: e.service_id.clone(),
                endpoint_id: e.endpoint_id.clone(),
                include_internal: e.include_internal,
                include_synthetic: e.include_synthetic,
                tag_filter_expression: tag_filter_to_api(
                    &format!("{field}.filter_expression"),
                    e.filter_expression.as_deref(),
                )?,
                ..Default::default()
            })
        })
        .variant("website", state.website.as_ref(), |e| {
            let field = "entity.website";
            Ok(SloEntity {
                kind: SLO_ENTITY_WEBSITE.to_string(),
                website_id: Some(require(&format!("{field}.website_id"), e.website_id.clone())?),
                beacon_type: Some(require(&format!("{field}.beacon_type"), e.beacon_type.clone())?),
                tag_filter_expression: tag_filter_to_api(
                    &format!("{field}.filter_expression"),
                    e.filter_expression.as_deref(),
                )?,
                ..Default::default()
            })
        })
        .variant("synthetic", state.synthetic.as_ref(), |e| {
            let field = "entity.synthetic";
            let ids = require(&format!("{field}.synthetic_test_ids"), e.synthetic_test_ids.as_ref())?;
            Ok(SloEntity {
                kind: SLO_ENTITY_SYNTHETIC.to_string(),
                synthetic_test_ids: Some(ids.iter().cloned().map(Value::String).collect()),
                tag_filter_expression: tag_filter_to_api(
                    &format!("{field}.filter_expression"),
                    e.filter_expression.as_deref(),
                )?,
                ..Default::default()
            })
        })
        .variant("infrastructure", state.infrastructure.as_ref(), |e| {
            let field = "entity.infrastructure";
            Ok(SloEntity {
                kind: SLO_ENTITY_INFRASTRUCTURE.to_string(),
                infra_type: Some(require(&format!("{field}.infra_type"), e.infra_type.clone())?),
                tag_filter_expression: tag_filter_to_api(
                    &format!("{field}.filter_expression"),
                    e.filter_expression.as_deref(),
                )?,
                ..Default::default()
            })
        })
        .required()
}

fn entity_from_api(entity: &SloEntity) -> Result<EntityState> {
    let filter_expression = tag_filter_from_api(entity.tag_filter_expression.as_ref())?;
    let mut state = EntityState::default();
    match entity.kind.as_str() {
        SLO_ENTITY_APPLICATION => {
            state.application = Some(ApplicationEntityState {
                application_id: entity.application_id.clone(),
                boundary_scope: entity.boundary_scope.clone(),
                service_id: entity.service_id.clone(),
                endpoint_id: entity.endpoint_id.clone(),
                include_internal: entity.include_internal,
                include_synthetic: entity.include_synthetic,
                filter_expression,
            })
        }
        SLO_ENTITY_WEBSITE => {
            state.website = Some(WebsiteEntityState {
                website_id: entity.website_id.clone(),
                beacon_type: entity.beacon_type.clone(),
                filter_expression,
            })
        }
        SLO_ENTITY_SYNTHETIC => {
            state.synthetic = Some(SyntheticEntityState {
                synthetic_test_ids: entity.synthetic_test_ids.as_ref().map(|ids| {
                    ids.iter()
                        .map(|id| match id {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect()
                }),
                filter_expression,
            })
        }
        SLO_ENTITY_INFRASTRUCTURE => {
            state.infrastructure = Some(InfrastructureEntityState {
                infra_type: entity.infra_type.clone(),
                filter_expression,
            })
        }
        other => return Err(Error::malformed(format!("unsupported slo entity type '{other}'"))),
    }
    Ok(state)
}

// ============================================================================
// Indicator
// ============================================================================

fn indicator(blueprint: &str, kind: &str) -> SloIndicator {
    SloIndicator {
        blueprint: blueprint.to_string(),
        kind: Some(kind.to_string()),
        ..Default::default()
    }
}

fn indicator_to_api(state: &IndicatorState) -> Result<SloIndicator> {
    OneOf::new("indicator")
        .variant("time_based_latency", state.time_based_latency.as_ref(), |i| {
            Ok(SloIndicator {
                threshold: Some(require("indicator.time_based_latency.threshold", i.threshold)?),
                aggregation: i.aggregation.clone(),
                ..indicator(SLO_BLUEPRINT_LATENCY, SLO_MEASUREMENT_TIME_BASED)
            })
        })
        .variant("event_based_latency", state.event_based_latency.as_ref(), |i| {
            Ok(SloIndicator {
                threshold: Some(require("indicator.event_based_latency.threshold", i.threshold)?),
                ..indicator(SLO_BLUEPRINT_LATENCY, SLO_MEASUREMENT_EVENT_BASED)
            })
        })
        .variant("time_based_availability", state.time_based_availability.as_ref(), |i| {
            Ok(SloIndicator {
                threshold: Some(require("indicator.time_based_availability.threshold", i.threshold)?),
                aggregation: i.aggregation.clone(),
                ..indicator(SLO_BLUEPRINT_AVAILABILITY, SLO_MEASUREMENT_TIME_BASED)
            })
        })
        .variant("event_based_availability", state.event_based_availability.as_ref(), |_| {
            Ok(indicator(SLO_BLUEPRINT_AVAILABILITY, SLO_MEASUREMENT_EVENT_BASED))
        })
        .variant("traffic", state.traffic.as_ref(), |i| {
            Ok(SloIndicator {
                blueprint: SLO_BLUEPRINT_TRAFFIC.to_string(),
                traffic_type: Some(require("indicator.traffic.traffic_type", i.traffic_type.clone())?),
                threshold: Some(require("indicator.traffic.threshold", i.threshold)?),
                operator: i.operator.clone(),
                ..Default::default()
            })
        })
        .variant("custom", state.custom.as_ref(), |i| {
            let field = "indicator.custom";
            Ok(SloIndicator {
                good_events_filter: tag_filter_to_api(
                    &format!("{field}.good_event_filter_expression"),
                    Some(require(
                        &format!("{field}.good_event_filter_expression"),
                        i.good_event_filter_expression.as_deref(),
                    )?),
                )?,
                bad_events_filter: tag_filter_to_api(
                    &format!("{field}.bad_event_filter_expression"),
                    i.bad_event_filter_expression.as_deref(),
                )?,
                ..indicator(SLO_BLUEPRINT_CUSTOM, SLO_MEASUREMENT_EVENT_BASED)
            })
        })
        .required()
}

fn indicator_from_api(indicator: &SloIndicator) -> Result<IndicatorState> {
    let mut state = IndicatorState::default();
    let kind = indicator.kind.as_deref().unwrap_or(SLO_MEASUREMENT_TIME_BASED);
    match (indicator.blueprint.as_str(), kind) {
        (SLO_BLUEPRINT_LATENCY, SLO_MEASUREMENT_EVENT_BASED) => {
            state.event_based_latency = Some(EventBasedLatencyState {
                threshold: indicator.threshold,
            })
        }
        (SLO_BLUEPRINT_LATENCY, _) => {
            state.time_based_latency = Some(ThresholdIndicatorState {
                threshold: indicator.threshold,
                aggregation: indicator.aggregation.clone(),
            })
        }
        (SLO_BLUEPRINT_AVAILABILITY, SLO_MEASUREMENT_EVENT_BASED) => {
            state.event_based_availability = Some(EventBasedAvailabilityState {})
        }
        (SLO_BLUEPRINT_AVAILABILITY, _) => {
            state.time_based_availability = Some(ThresholdIndicatorState {
                threshold: indicator.threshold,
                aggregation: indicator.aggregation.clone(),
            })
        }
        (SLO_BLUEPRINT_TRAFFIC, _) => {
            state.traffic = Some(TrafficIndicatorState {
                traffic_type: indicator.traffic_type.clone(),
                threshold: indicator.threshold,
                operator: indicator.operator.clone(),
            })
        }
        (SLO_BLUEPRINT_CUSTOM, _) => {
            state.custom = Some(CustomIndicatorState {
                good_event_filter_expression: tag_filter_from_api(indicator.good_events_filter.as_ref())?,
                bad_event_filter_expression: tag_filter_from_api(indicator.bad_events_filter.as_ref())?,
            })
        }
        (other, _) => {
            return Err(Error::malformed(format!(
                "unsupported slo indicator blueprint '{other}'"
            )))
        }
    }
    Ok(state)
}

// ============================================================================
// Time Window
// ============================================================================

fn time_window_to_api(state: &TimeWindowState) -> Result<SloTimeWindow> {
    OneOf::new("time_window")
        .variant("rolling", state.rolling.as_ref(), |w| {
            Ok(SloTimeWindow {
                kind: SLO_TIME_WINDOW_ROLLING.to_string(),
                duration: require("time_window.rolling.duration", w.duration)?,
                duration_unit: require("time_window.rolling.duration_unit", w.duration_unit.clone())?,
                timezone: w.timezone.clone(),
                start_timestamp: None,
            })
        })
        .variant("fixed", state.fixed.as_ref(), |w| {
            Ok(SloTimeWindow {
                kind: SLO_TIME_WINDOW_FIXED.to_string(),
                duration: require("time_window.fixed.duration", w.duration)?,
                duration_unit: require("time_window.fixed.duration_unit", w.duration_unit.clone())?,
                timezone: w.timezone.clone(),
                start_timestamp: Some(require("time_window.fixed.start_timestamp", w.start_timestamp)?),
            })
        })
        .required()
}

fn time_window_from_api(window: &SloTimeWindow) -> Result<TimeWindowState> {
    let mut state = TimeWindowState::default();
    match window.kind.as_str() {
        SLO_TIME_WINDOW_ROLLING => {
            state.rolling = Some(RollingWindowState {
                duration: Some(window.duration),
                duration_unit: Some(window.duration_unit.clone()),
                timezone: window.timezone.clone(),
            })
        }
        SLO_TIME_WINDOW_FIXED => {
            state.fixed = Some(FixedWindowState {
                duration: Some(window.duration),
                duration_unit: Some(window.duration_unit.clone()),
                timezone: window.timezone.clone(),
                start_timestamp: window.start_timestamp,
            })
        }
        other => return Err(Error::malformed(format!("unsupported slo time window '{other}'"))),
    }
    Ok(state)
}

// ============================================================================
// Handle
// ============================================================================

pub struct SloConfigResource {
    metadata: ResourceMetadata,
}

impl SloConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 0),
        }
    }
}

impl Default for SloConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for SloConfigResource {
    type State = SloConfigState;
    type Api = SloConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<SloConfig>> {
        api.slo_configs()
    }

    fn map_state_to_api(&self, state: &SloConfigState) -> Result<SloConfig> {
        if !(0.0..=1.0).contains(&state.target) {
            return Err(Error::invalid_configuration("target", "target must be between 0 and 1"));
        }
        Ok(SloConfig {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            target: state.target,
            tags: state.tags.iter().cloned().collect(),
            entity: entity_to_api(&state.entity)?,
            indicator: indicator_to_api(&state.indicator)?,
            time_window: time_window_to_api(&state.time_window)?,
            rbac_tags: state
                .rbac_tags
                .iter()
                .flatten()
                .map(|t| RbacTag {
                    display_name: t.display_name.clone(),
                    id: t.id.clone(),
                })
                .collect(),
        })
    }

    fn update_state(&self, config: &SloConfig, _previous: Option<&SloConfigState>) -> Result<SloConfigState> {
        Ok(SloConfigState {
            id: config.id.clone(),
            name: config.name.clone(),
            target: config.target,
            tags: config.tags.iter().cloned().collect(),
            entity: entity_from_api(&config.entity)?,
            indicator: indicator_from_api(&config.indicator)?,
            time_window: time_window_from_api(&config.time_window)?,
            rbac_tags: (!config.rbac_tags.is_empty()).then(|| {
                config
                    .rbac_tags
                    .iter()
                    .map(|t| RbacTagState {
                        display_name: t.display_name.clone(),
                        id: t.id.clone(),
                    })
                    .collect()
            }),
        })
    }
}
