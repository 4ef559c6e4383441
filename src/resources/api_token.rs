//! `instana_api_token`
//!
//! Permissions are flat boolean attributes named after the wire flags in
//! snake case (`canConfigureUsers` is `can_configure_users`).

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::{Error, Result};
use crate::mapping::require_str;
use crate::restapi::api_token::API_TOKEN_PERMISSIONS;
use crate::restapi::{ApiToken, InstanaApi, RestResource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

pub const RESOURCE_NAME: &str = "instana_api_token";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiTokenState {
    pub id: String,
    pub access_granting_token: String,
    pub internal_id: String,
    pub name: String,
    #[serde(flatten)]
    pub permissions: BTreeMap<String, bool>,
}

state_with_id!(ApiTokenState);

/// State attribute name of a wire permission flag
pub fn permission_attribute(wire_name: &str) -> String {
    let mut attribute = String::with_capacity(wire_name.len() + 8);
    for c in wire_name.chars() {
        if c.is_ascii_uppercase() {
            attribute.push('_');
            attribute.push(c.to_ascii_lowercase());
        } else {
            attribute.push(c);
        }
    }
    attribute
}

pub struct ApiTokenResource {
    metadata: ResourceMetadata,
}

impl ApiTokenResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 1).resource_id_field("internal_id"),
        }
    }
}

impl Default for ApiTokenResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for ApiTokenResource {
    type State = ApiTokenState;
    type Api = ApiToken;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<ApiToken>> {
        api.api_tokens()
    }

    fn set_computed_fields(&self, plan: &mut ApiTokenState) -> Result<()> {
        plan.internal_id = Uuid::new_v4().to_string();
        plan.access_granting_token = Uuid::new_v4().to_string();
        Ok(())
    }

    fn graft_state(&self, plan: &mut ApiTokenState, state: &ApiTokenState) {
        plan.id = state.id.clone();
        plan.internal_id = state.internal_id.clone();
        plan.access_granting_token = state.access_granting_token.clone();
    }

    fn map_state_to_api(&self, state: &ApiTokenState) -> Result<ApiToken> {
        let known: BTreeMap<String, &str> = API_TOKEN_PERMISSIONS
            .iter()
            .map(|wire| (permission_attribute(wire), *wire))
            .collect();
        if let Some(unknown) = state.permissions.keys().find(|k| !known.contains_key(*k)) {
            return Err(Error::invalid_configuration(
                unknown.as_str(),
                "unknown api token permission",
            ));
        }

        let mut token = ApiToken {
            id: state.id.clone(),
            access_granting_token: state.access_granting_token.clone(),
            internal_id: state.internal_id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            permissions: BTreeMap::new(),
        };
        for (attribute, wire) in &known {
            token.set_permission(wire, state.permissions.get(attribute).copied().unwrap_or(false));
        }
        Ok(token)
    }

    fn update_state(&self, token: &ApiToken, _previous: Option<&ApiTokenState>) -> Result<ApiTokenState> {
        Ok(ApiTokenState {
            id: token.id.clone(),
            access_granting_token: token.access_granting_token.clone(),
            internal_id: token.internal_id.clone(),
            name: token.name.clone(),
            permissions: API_TOKEN_PERMISSIONS
                .iter()
                .map(|wire| (permission_attribute(wire), token.permission(wire)))
                .collect(),
        })
    }
}
