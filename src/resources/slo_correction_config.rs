//! `instana_slo_correction_config`

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::Result;
use crate::mapping::{require_str, set_to_vec, validate_value, vec_to_set};
use crate::restapi::slo_correction_config::{Scheduling, DURATION_UNITS};
use crate::restapi::{InstanaApi, RestResource, SloCorrectionConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_slo_correction_config";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SloCorrectionConfigState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub scheduling: SchedulingState,
    pub slo_ids: BTreeSet<String>,
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingState {
    pub start_time: i64,
    pub duration: i64,
    pub duration_unit: String,
    pub recurrent_rule: Option<String>,
    pub recurrent: bool,
}

state_with_id!(SloCorrectionConfigState);

pub struct SloCorrectionConfigResource {
    metadata: ResourceMetadata,
}

impl SloCorrectionConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 0),
        }
    }
}

impl Default for SloCorrectionConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for SloCorrectionConfigResource {
    type State = SloCorrectionConfigState;
    type Api = SloCorrectionConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<SloCorrectionConfig>> {
        api.slo_correction_configs()
    }

    fn map_state_to_api(&self, state: &SloCorrectionConfigState) -> Result<SloCorrectionConfig> {
        let scheduling = &state.scheduling;
        Ok(SloCorrectionConfig {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            description: state.description.clone(),
            active: state.active,
            scheduling: Scheduling {
                start_time: scheduling.start_time,
                duration: scheduling.duration,
                duration_unit: validate_value(
                    "scheduling.duration_unit",
                    &scheduling.duration_unit.to_ascii_uppercase(),
                    DURATION_UNITS,
                )?
                .to_string(),
                recurrent_rule: scheduling.recurrent_rule.clone().filter(|r| !r.is_empty()),
                recurrent: scheduling.recurrent,
            },
            slo_ids: set_to_vec(&state.slo_ids),
            tags: set_to_vec(&state.tags),
        })
    }

    fn update_state(
        &self,
        config: &SloCorrectionConfig,
        _previous: Option<&SloCorrectionConfigState>,
    ) -> Result<SloCorrectionConfigState> {
        Ok(SloCorrectionConfigState {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            active: config.active,
            scheduling: SchedulingState {
                start_time: config.scheduling.start_time,
                duration: config.scheduling.duration,
                duration_unit: config.scheduling.duration_unit.clone(),
                recurrent_rule: config.scheduling.recurrent_rule.clone(),
                recurrent: config.scheduling.recurrent,
            },
            slo_ids: vec_to_set(&config.slo_ids),
            tags: vec_to_set(&config.tags),
        })
    }
}
