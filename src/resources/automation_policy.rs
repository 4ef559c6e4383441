//! `instana_automation_policy`

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::{require_str, set_to_vec};
use crate::restapi::automation::{
    ActionConfiguration, ActionRef, Condition, InputParameterValue, RunConfiguration, Runnable,
    Trigger, TypeConfiguration,
};
use crate::restapi::{AutomationPolicy, InstanaApi, RestResource};
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_automation_policy";

const RUNNABLE_TYPE: &str = "basic";
const TRIGGER_TYPES: &[&str] = &[
    "customEvent",
    "builtinEvent",
    "applicationSmartAlert",
    "globalApplicationSmartAlert",
    "websiteSmartAlert",
    "infraSmartAlert",
    "mobileAppSmartAlert",
    "syntheticsSmartAlert",
    "logSmartAlert",
    "sloSmartAlert",
];
const POLICY_NAMES: &[&str] = &["manual", "automatic"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationPolicyState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: BTreeSet<String>,
    pub trigger: TriggerState,
    pub type_configuration: Vec<TypeConfigurationState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerState {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeConfigurationState {
    pub name: String,
    pub condition: Option<ConditionState>,
    pub action: Vec<PolicyActionState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionState {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyActionState {
    pub action_id: String,
    pub agent_id: Option<String>,
    pub input_parameters: StringMap,
}

state_with_id!(AutomationPolicyState);

fn type_configuration_to_api(i: usize, state: &TypeConfigurationState) -> Result<TypeConfiguration> {
    let field = format!("type_configuration[{i}]");
    if !POLICY_NAMES.contains(&state.name.as_str()) {
        return Err(Error::invalid_configuration(
            format!("{field}.name"),
            format!("'{}' is not one of {}", state.name, POLICY_NAMES.join(", ")),
        ));
    }
    if state.action.is_empty() {
        return Err(Error::invalid_configuration(
            format!("{field}.action"),
            "at least one action is required",
        ));
    }
    let actions = state
        .action
        .iter()
        .enumerate()
        .map(|(j, action)| {
            Ok(ActionConfiguration {
                action: ActionRef {
                    id: require_str(&format!("{field}.action[{j}].action_id"), &action.action_id)?
                        .to_string(),
                },
                agent_id: action.agent_id.clone().unwrap_or_default(),
                input_parameter_values: action
                    .input_parameters
                    .iter()
                    .map(|(name, value)| InputParameterValue {
                        name: name.clone(),
                        value: value.clone(),
                    })
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(TypeConfiguration {
        name: state.name.clone(),
        condition: state
            .condition
            .as_ref()
            .filter(|c| !c.query.is_empty())
            .map(|c| Condition {
                query: c.query.clone(),
            }),
        runnable: Runnable {
            id: String::new(),
            kind: RUNNABLE_TYPE.to_string(),
            run_configuration: RunConfiguration { actions },
        },
    })
}

fn type_configuration_from_api(config: &TypeConfiguration) -> TypeConfigurationState {
    TypeConfigurationState {
        name: config.name.clone(),
        condition: config.condition.as_ref().map(|c| ConditionState {
            query: c.query.clone(),
        }),
        action: config
            .runnable
            .run_configuration
            .actions
            .iter()
            .map(|a| PolicyActionState {
                action_id: a.action.id.clone(),
                agent_id: Some(a.agent_id.clone()).filter(|id| !id.is_empty()),
                input_parameters: a
                    .input_parameter_values
                    .iter()
                    .map(|p| (p.name.clone(), p.value.clone()))
                    .collect(),
            })
            .collect(),
    }
}

fn tags_from_api(tags: &Value) -> BTreeSet<String> {
    match tags {
        Value::Array(items) => items
            .iter()
            .filter_map(|t| t.as_str().map(str::to_string))
            .collect(),
        _ => BTreeSet::new(),
    }
}

pub struct AutomationPolicyResource {
    metadata: ResourceMetadata,
}

impl AutomationPolicyResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 0),
        }
    }
}

impl Default for AutomationPolicyResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for AutomationPolicyResource {
    type State = AutomationPolicyState;
    type Api = AutomationPolicy;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<AutomationPolicy>> {
        api.automation_policies()
    }

    fn map_state_to_api(&self, state: &AutomationPolicyState) -> Result<AutomationPolicy> {
        if !TRIGGER_TYPES.contains(&state.trigger.kind.as_str()) {
            return Err(Error::invalid_configuration(
                "trigger.type",
                format!("'{}' is not one of {}", state.trigger.kind, TRIGGER_TYPES.join(", ")),
            ));
        }
        Ok(AutomationPolicy {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            description: state.description.clone(),
            tags: Value::from(set_to_vec(&state.tags)),
            trigger: Trigger {
                id: require_str("trigger.id", &state.trigger.id)?.to_string(),
                kind: state.trigger.kind.clone(),
            },
            type_configurations: state
                .type_configuration
                .iter()
                .enumerate()
                .map(|(i, c)| type_configuration_to_api(i, c))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    fn update_state(
        &self,
        policy: &AutomationPolicy,
        _previous: Option<&AutomationPolicyState>,
    ) -> Result<AutomationPolicyState> {
        Ok(AutomationPolicyState {
            id: policy.id.clone(),
            name: policy.name.clone(),
            description: policy.description.clone(),
            tags: tags_from_api(&policy.tags),
            trigger: TriggerState {
                id: policy.trigger.id.clone(),
                kind: policy.trigger.kind.clone(),
            },
            type_configuration: policy
                .type_configurations
                .iter()
                .map(type_configuration_from_api)
                .collect(),
        })
    }
}
