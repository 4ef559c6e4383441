//! API tokens

use super::object::InstanaDataObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Permission flags of an API token, by wire name
pub const API_TOKEN_PERMISSIONS: &[&str] = &[
    "canConfigureServiceMapping",
    "canConfigureEumApplications",
    "canConfigureMobileAppMonitoring",
    "canConfigureUsers",
    "canInstallNewAgents",
    "canConfigureIntegrations",
    "canConfigureEventsAndAlerts",
    "canConfigureMaintenanceWindows",
    "canConfigureApplicationSmartAlerts",
    "canConfigureWebsiteSmartAlerts",
    "canConfigureMobileAppSmartAlerts",
    "canConfigureApiTokens",
    "canConfigureAgentRunMode",
    "canViewAuditLog",
    "canConfigureAgents",
    "canConfigureAuthenticationMethods",
    "canConfigureApplications",
    "canConfigureTeams",
    "canConfigureReleases",
    "canConfigureLogManagement",
    "canCreatePublicCustomDashboards",
    "canViewLogs",
    "canViewTraceDetails",
    "canConfigureSessionSettings",
    "canConfigureGlobalAlertPayload",
    "canConfigureGlobalApplicationSmartAlerts",
    "canConfigureGlobalSyntheticSmartAlerts",
    "canConfigureGlobalInfraSmartAlerts",
    "canConfigureGlobalLogSmartAlerts",
    "canViewAccountAndBillingInformation",
    "canEditAllAccessibleCustomDashboards",
    "limitedApplicationsScope",
    "limitedBizOpsScope",
    "limitedWebsitesScope",
    "limitedKubernetesScope",
    "limitedMobileAppsScope",
    "limitedInfrastructureScope",
    "limitedSyntheticsScope",
    "limitedVsphereScope",
    "limitedPhmcScope",
    "limitedPvcScope",
    "limitedZhmcScope",
    "limitedPcfScope",
    "limitedOpenstackScope",
    "limitedAutomationScope",
    "limitedLogsScope",
    "limitedNutanixScope",
    "limitedXenServerScope",
    "limitedWindowsHypervisorScope",
    "limitedAlertChannelsScope",
    "limitedLinuxKvmHypervisorScope",
    "limitedServiceLevelScope",
    "canConfigurePersonalApiTokens",
    "canConfigureDatabaseManagement",
    "canConfigureAutomationActions",
    "canConfigureAutomationPolicies",
    "canRunAutomationActions",
    "canDeleteAutomationActionHistory",
    "canConfigureSyntheticTests",
    "canConfigureSyntheticLocations",
    "canConfigureSyntheticCredentials",
    "canViewSyntheticTests",
    "canViewSyntheticLocations",
    "canViewSyntheticTestResults",
    "canUseSyntheticCredentials",
    "canConfigureBizops",
    "canViewBusinessProcesses",
    "canViewBusinessProcessDetails",
    "canViewBusinessActivities",
    "canViewBizAlerts",
    "canDeleteLogs",
];

/// API token; the public `id` is a secret, so paths use `internalId`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiToken {
    pub id: String,
    pub access_granting_token: String,
    pub internal_id: String,
    pub name: String,
    #[serde(flatten)]
    pub permissions: BTreeMap<String, Value>,
}

impl ApiToken {
    /// Read a permission flag; absent flags are false
    pub fn permission(&self, wire_name: &str) -> bool {
        self.permissions
            .get(wire_name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Set a permission flag
    pub fn set_permission(&mut self, wire_name: &str, enabled: bool) {
        self.permissions
            .insert(wire_name.to_string(), Value::Bool(enabled));
    }
}

impl InstanaDataObject for ApiToken {
    fn id_for_path(&self) -> &str {
        &self.internal_id
    }
}
