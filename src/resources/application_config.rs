//! `instana_application_config`

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::Result;
use crate::mapping::{require_str, tag_filter_from_api, tag_filter_to_api, validate_value};
use crate::restapi::application_config::{
    AccessRule, ACCESS_TYPES, APPLICATION_CONFIG_SCOPES, BOUNDARY_SCOPES, RELATION_TYPES,
};
use crate::restapi::{ApplicationConfig, InstanaApi, RestResource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_application_config";

const DEFAULT_SCOPE: &str = "INCLUDE_NO_DOWNSTREAM";
const DEFAULT_BOUNDARY_SCOPE: &str = "DEFAULT";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfigState {
    pub id: String,
    pub label: String,
    pub scope: Option<String>,
    pub boundary_scope: Option<String>,
    pub tag_filter: Option<String>,
    pub access_rule: Option<Vec<AccessRuleState>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessRuleState {
    pub access_type: String,
    pub related_id: Option<String>,
    pub relation_type: String,
}

state_with_id!(ApplicationConfigState);

/// Access rules shared with custom dashboards
pub(crate) fn access_rules_to_api(rules: Option<&Vec<AccessRuleState>>) -> Result<Vec<AccessRule>> {
    let Some(rules) = rules.filter(|r| !r.is_empty()) else {
        return Ok(vec![AccessRule {
            access_type: "READ_WRITE".to_string(),
            related_id: None,
            relation_type: "GLOBAL".to_string(),
        }]);
    };
    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            Ok(AccessRule {
                access_type: validate_value(
                    &format!("access_rule[{i}].access_type"),
                    &rule.access_type,
                    ACCESS_TYPES,
                )?
                .to_string(),
                related_id: rule.related_id.clone().filter(|id| !id.is_empty()),
                relation_type: validate_value(
                    &format!("access_rule[{i}].relation_type"),
                    &rule.relation_type,
                    RELATION_TYPES,
                )?
                .to_string(),
            })
        })
        .collect()
}

pub(crate) fn access_rules_from_api(rules: &[AccessRule]) -> Option<Vec<AccessRuleState>> {
    if rules.is_empty() {
        return None;
    }
    Some(
        rules
            .iter()
            .map(|rule| AccessRuleState {
                access_type: rule.access_type.clone(),
                related_id: rule.related_id.clone(),
                relation_type: rule.relation_type.clone(),
            })
            .collect(),
    )
}

pub struct ApplicationConfigResource {
    metadata: ResourceMetadata,
}

impl ApplicationConfigResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 4),
        }
    }
}

impl Default for ApplicationConfigResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for ApplicationConfigResource {
    type State = ApplicationConfigState;
    type Api = ApplicationConfig;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<ApplicationConfig>> {
        api.application_configs()
    }

    fn map_state_to_api(&self, state: &ApplicationConfigState) -> Result<ApplicationConfig> {
        let scope = state.scope.as_deref().unwrap_or(DEFAULT_SCOPE);
        let boundary_scope = state.boundary_scope.as_deref().unwrap_or(DEFAULT_BOUNDARY_SCOPE);
        Ok(ApplicationConfig {
            id: state.id.clone(),
            label: require_str("label", &state.label)?.to_string(),
            scope: validate_value("scope", scope, APPLICATION_CONFIG_SCOPES)?.to_string(),
            boundary_scope: validate_value("boundary_scope", boundary_scope, BOUNDARY_SCOPES)?
                .to_string(),
            tag_filter_expression: tag_filter_to_api("tag_filter", state.tag_filter.as_deref())?,
            access_rules: access_rules_to_api(state.access_rule.as_ref())?,
        })
    }

    fn update_state(
        &self,
        config: &ApplicationConfig,
        _previous: Option<&ApplicationConfigState>,
    ) -> Result<ApplicationConfigState> {
        Ok(ApplicationConfigState {
            id: config.id.clone(),
            label: config.label.clone(),
            scope: Some(config.scope.clone()),
            boundary_scope: Some(config.boundary_scope.clone()),
            tag_filter: tag_filter_from_api(config.tag_filter_expression.as_ref())?,
            access_rule: access_rules_from_api(&config.access_rules),
        })
    }
}
