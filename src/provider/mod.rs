//! Provider registry and dispatch
//!
//! [`Provider::configure`] validates the process-wide settings, builds the
//! transport once and binds every resource and data source to it. Requests
//! are dispatched by type name with JSON state documents.

use crate::config::ProviderConfig;
use crate::datasources::{all_data_sources, DynDataSource};
use crate::error::{Error, Result};
use crate::http::{InstanaClient, RestClient};
use crate::resources::{all_resources, DynResource, ResourceMetadata};
use crate::restapi::InstanaApi;
use crate::types::{Context, JsonValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// Operations
// ============================================================================

/// Lifecycle operation addressed to a resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Operation::Create),
            "read" => Ok(Operation::Read),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            "import" => Ok(Operation::Import),
            other => Err(Error::invalid_configuration(
                "operation",
                format!("'{other}' is not one of create, read, update, delete, import"),
            )),
        }
    }
}

/// Inputs of one operation; which fields are needed depends on the operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationRequest {
    pub plan: Option<JsonValue>,
    pub state: Option<JsonValue>,
    pub id: Option<String>,
}

impl OperationRequest {
    fn plan(&mut self) -> Result<JsonValue> {
        self.plan
            .take()
            .ok_or_else(|| Error::invalid_configuration("plan", "plan document is required"))
    }

    fn state(&mut self) -> Result<JsonValue> {
        self.state
            .take()
            .ok_or_else(|| Error::invalid_configuration("state", "state document is required"))
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Configured provider with every resource and data source registered
pub struct Provider {
    api: InstanaApi,
    resources: BTreeMap<&'static str, Arc<dyn DynResource>>,
    data_sources: BTreeMap<&'static str, Arc<dyn DynDataSource>>,
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("data_sources", &self.data_sources.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Provider {
    /// Validate `config` and build the provider over a fresh transport
    pub fn configure(config: ProviderConfig) -> Result<Self> {
        config.validate()?;
        let client = InstanaClient::new(config.http_client_config())?;
        info!(
            endpoint = %config.endpoint,
            tls_skip_verify = config.tls_skip_verify,
            "Configured Instana provider"
        );
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Build the provider over an existing transport
    pub fn with_client(client: Arc<dyn RestClient>) -> Self {
        let api = InstanaApi::new(client);
        let resources = all_resources(&api)
            .into_iter()
            .map(|r| (r.metadata().resource_name, r))
            .collect();
        let data_sources = all_data_sources(&api)
            .into_iter()
            .map(|d| (d.name(), d))
            .collect();
        Self {
            api,
            resources,
            data_sources,
        }
    }

    pub fn api(&self) -> &InstanaApi {
        &self.api
    }

    /// Registered resource type names, sorted
    pub fn resource_names(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    /// Registered data source names, sorted
    pub fn data_source_names(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }

    /// Metadata of every resource type, sorted by name
    pub fn schemas(&self) -> Vec<ResourceMetadata> {
        self.resources.values().map(|r| r.metadata().clone()).collect()
    }

    /// Resource registered under `type_name`
    pub fn resource(&self, type_name: &str) -> Result<&Arc<dyn DynResource>> {
        self.resources.get(type_name).ok_or_else(|| Error::UnknownResource {
            name: type_name.to_string(),
        })
    }

    fn data_source(&self, name: &str) -> Result<&Arc<dyn DynDataSource>> {
        self.data_sources.get(name).ok_or_else(|| Error::UnknownResource {
            name: name.to_string(),
        })
    }

    pub async fn create(&self, ctx: &Context, type_name: &str, plan: JsonValue) -> Result<JsonValue> {
        self.resource(type_name)?.create_json(ctx, plan).await
    }

    /// Refresh a resource; `None` when it no longer exists
    pub async fn read(
        &self,
        ctx: &Context,
        type_name: &str,
        state: JsonValue,
    ) -> Result<Option<JsonValue>> {
        self.resource(type_name)?.read_json(ctx, state).await
    }

    pub async fn update(
        &self,
        ctx: &Context,
        type_name: &str,
        plan: JsonValue,
        state: JsonValue,
    ) -> Result<JsonValue> {
        self.resource(type_name)?.update_json(ctx, plan, state).await
    }

    pub async fn delete(&self, ctx: &Context, type_name: &str, state: JsonValue) -> Result<()> {
        self.resource(type_name)?.delete_json(ctx, state).await
    }

    pub async fn import(&self, ctx: &Context, type_name: &str, id: &str) -> Result<JsonValue> {
        self.resource(type_name)?.import_json(ctx, id).await
    }

    /// Resolve a data source query
    pub async fn read_data_source(
        &self,
        ctx: &Context,
        name: &str,
        query: JsonValue,
    ) -> Result<JsonValue> {
        self.data_source(name)?.read_json(ctx, query).await
    }

    /// Run `operation` on `type_name`; read yields `null` for an absent
    /// resource and delete yields `null` on success
    pub async fn apply(
        &self,
        ctx: &Context,
        type_name: &str,
        operation: Operation,
        mut request: OperationRequest,
    ) -> Result<JsonValue> {
        debug!(resource = type_name, operation = %operation, "Dispatching operation");
        match operation {
            Operation::Create => self.create(ctx, type_name, request.plan()?).await,
            Operation::Read => Ok(self
                .read(ctx, type_name, request.state()?)
                .await?
                .unwrap_or(JsonValue::Null)),
            Operation::Update => {
                let plan = request.plan()?;
                let state = request.state()?;
                self.update(ctx, type_name, plan, state).await
            }
            Operation::Delete => {
                self.delete(ctx, type_name, request.state()?).await?;
                Ok(JsonValue::Null)
            }
            Operation::Import => {
                let id = request
                    .id
                    .take()
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| Error::invalid_configuration("id", "id is required"))?;
                self.import(ctx, type_name, &id).await
            }
        }
    }
}

#[cfg(test)]
mod tests;
