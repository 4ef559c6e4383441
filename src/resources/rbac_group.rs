//! `instana_rbac_group`

use super::handle::{state_with_id, ResourceHandle, ResourceMetadata};
use crate::error::Result;
use crate::mapping::require_str;
use crate::restapi::group::{APIMember, APIPermissionSetWithRoles, ScopeBinding};
use crate::restapi::{Group, InstanaApi, RestResource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RESOURCE_NAME: &str = "instana_rbac_group";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacGroupState {
    pub id: String,
    pub name: String,
    pub member: BTreeSet<MemberState>,
    pub permission_set: Option<PermissionSetState>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberState {
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSetState {
    pub application_ids: BTreeSet<String>,
    pub kubernetes_cluster_uuids: BTreeSet<String>,
    pub kubernetes_namespace_uids: BTreeSet<String>,
    pub mobile_app_ids: BTreeSet<String>,
    pub website_ids: BTreeSet<String>,
    pub infra_dfq_filter: Option<String>,
    pub permissions: BTreeSet<String>,
}

state_with_id!(RbacGroupState);

fn bindings_to_api(ids: &BTreeSet<String>) -> Vec<ScopeBinding> {
    ids.iter().map(ScopeBinding::new).collect()
}

fn bindings_from_api(bindings: &[ScopeBinding]) -> BTreeSet<String> {
    bindings.iter().map(|b| b.scope_id.clone()).collect()
}

fn permission_set_to_api(state: Option<&PermissionSetState>) -> APIPermissionSetWithRoles {
    let Some(state) = state else {
        return APIPermissionSetWithRoles::default();
    };
    APIPermissionSetWithRoles {
        application_ids: bindings_to_api(&state.application_ids),
        infra_dfq_filter: state
            .infra_dfq_filter
            .as_ref()
            .filter(|f| !f.is_empty())
            .map(ScopeBinding::new),
        kubernetes_cluster_uuids: bindings_to_api(&state.kubernetes_cluster_uuids),
        kubernetes_namespace_uids: bindings_to_api(&state.kubernetes_namespace_uids),
        mobile_app_ids: bindings_to_api(&state.mobile_app_ids),
        website_ids: bindings_to_api(&state.website_ids),
        permissions: state.permissions.iter().cloned().collect(),
    }
}

fn permission_set_from_api(set: &APIPermissionSetWithRoles) -> Option<PermissionSetState> {
    let state = PermissionSetState {
        application_ids: bindings_from_api(&set.application_ids),
        kubernetes_cluster_uuids: bindings_from_api(&set.kubernetes_cluster_uuids),
        kubernetes_namespace_uids: bindings_from_api(&set.kubernetes_namespace_uids),
        mobile_app_ids: bindings_from_api(&set.mobile_app_ids),
        website_ids: bindings_from_api(&set.website_ids),
        infra_dfq_filter: set.infra_dfq_filter.as_ref().map(|f| f.scope_id.clone()),
        permissions: set.permissions.iter().cloned().collect(),
    };
    (state != PermissionSetState::default()).then_some(state)
}

pub struct RbacGroupResource {
    metadata: ResourceMetadata,
}

impl RbacGroupResource {
    pub fn new() -> Self {
        Self {
            metadata: ResourceMetadata::new(RESOURCE_NAME, 0),
        }
    }
}

impl Default for RbacGroupResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for RbacGroupResource {
    type State = RbacGroupState;
    type Api = Group;

    fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<Group>> {
        api.groups()
    }

    fn map_state_to_api(&self, state: &RbacGroupState) -> Result<Group> {
        Ok(Group {
            id: state.id.clone(),
            name: require_str("name", &state.name)?.to_string(),
            members: state
                .member
                .iter()
                .map(|m| APIMember {
                    user_id: m.user_id.clone(),
                    email: m.email.clone().filter(|e| !e.is_empty()),
                })
                .collect(),
            permission_set: permission_set_to_api(state.permission_set.as_ref()),
        })
    }

    fn update_state(&self, group: &Group, _previous: Option<&RbacGroupState>) -> Result<RbacGroupState> {
        Ok(RbacGroupState {
            id: group.id.clone(),
            name: group.name.clone(),
            member: group
                .members
                .iter()
                .map(|m| MemberState {
                    user_id: m.user_id.clone(),
                    email: m.email.clone(),
                })
                .collect(),
            permission_set: permission_set_from_api(&group.permission_set),
        })
    }
}
