//! RBAC groups

use super::object::data_object_with_id;
use serde::{Deserialize, Serialize};

/// Access-control group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<APIMember>,
    pub permission_set: APIPermissionSetWithRoles,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIMember {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIPermissionSetWithRoles {
    #[serde(default)]
    pub application_ids: Vec<ScopeBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_dfq_filter: Option<ScopeBinding>,
    #[serde(rename = "kubernetesClusterUUIDs", default)]
    pub kubernetes_cluster_uuids: Vec<ScopeBinding>,
    #[serde(rename = "kubernetesNamespaceUIDs", default)]
    pub kubernetes_namespace_uids: Vec<ScopeBinding>,
    #[serde(default)]
    pub mobile_app_ids: Vec<ScopeBinding>,
    #[serde(default)]
    pub website_ids: Vec<ScopeBinding>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeBinding {
    pub scope_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_role_id: Option<String>,
}

impl ScopeBinding {
    pub fn new(scope_id: impl Into<String>) -> Self {
        Self {
            scope_id: scope_id.into(),
            scope_role_id: None,
        }
    }
}

data_object_with_id!(Group);
