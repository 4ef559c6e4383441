//! Generic resource lifecycle
//!
//! [`ResourceDriver`] runs create, read, update, delete and import for any
//! [`ResourceHandle`]. [`DynResource`] erases the state type so the provider
//! can dispatch JSON documents by type name.

use super::handle::{ResourceHandle, ResourceMetadata, StateModel};
use crate::error::{Error, Result};
use crate::restapi::{InstanaApi, InstanaDataObject, RestResource};
use crate::types::{Context, JsonValue};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ============================================================================
// Typed Driver
// ============================================================================

/// Lifecycle driver over one resource handle
pub struct ResourceDriver<H: ResourceHandle> {
    handle: H,
    resource: Arc<dyn RestResource<H::Api>>,
}

impl<H: ResourceHandle> ResourceDriver<H> {
    pub fn new(handle: H, api: &InstanaApi) -> Self {
        let resource = handle.rest_resource(api);
        Self { handle, resource }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Create the resource described by `plan` and return the new state
    pub async fn create(&self, ctx: &Context, mut plan: H::State) -> Result<H::State> {
        ctx.check()?;
        let metadata = self.handle.metadata();
        if !metadata.skip_id_generation {
            plan.set_id(Uuid::new_v4().to_string());
        }
        self.handle.set_computed_fields(&mut plan)?;

        let object = self.handle.map_state_to_api(&plan)?;
        let created = self.resource.create(ctx, &object).await?;
        info!(
            resource = metadata.resource_name,
            id = created.id_for_path(),
            "Created resource"
        );
        self.handle.update_state(&created, Some(&plan))
    }

    /// Refresh `state`; `None` when the resource no longer exists
    pub async fn read(&self, ctx: &Context, state: &H::State) -> Result<Option<H::State>> {
        let metadata = self.handle.metadata();
        let id = resource_id(metadata, state)?;
        if id.is_empty() {
            return Err(Error::invalid_configuration(
                metadata.resource_id_field,
                "resource id is empty",
            ));
        }

        match self.resource.get_one(ctx, &id).await {
            Ok(object) => self.handle.update_state(&object, Some(state)).map(Some),
            Err(e) if e.is_not_found() => {
                warn!(
                    resource = metadata.resource_name,
                    id = %id,
                    "Resource not found, marking as absent"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Apply `plan` to the resource stored as `state`; create-only
    /// resources fail before mapping or I/O
    pub async fn update(
        &self,
        ctx: &Context,
        mut plan: H::State,
        state: &H::State,
    ) -> Result<H::State> {
        ctx.check()?;
        let metadata = self.handle.metadata();
        if metadata.create_only {
            return Err(Error::operation_not_supported(metadata.resource_name));
        }
        self.handle.graft_state(&mut plan, state);

        let object = self.handle.map_state_to_api(&plan)?;
        let updated = self.resource.update(ctx, &object).await?;
        info!(
            resource = metadata.resource_name,
            id = updated.id_for_path(),
            "Updated resource"
        );
        self.handle.update_state(&updated, Some(&plan))
    }

    /// Delete the resource stored as `state`
    pub async fn delete(&self, ctx: &Context, state: &H::State) -> Result<()> {
        let object = self.handle.map_state_to_api(state)?;
        self.resource.delete(ctx, &object).await?;
        info!(
            resource = self.handle.metadata().resource_name,
            id = object.id_for_path(),
            "Deleted resource"
        );
        Ok(())
    }

    /// Adopt an existing resource by its identifier
    pub async fn import(&self, ctx: &Context, id: &str) -> Result<H::State> {
        let metadata = self.handle.metadata();
        let seed: H::State = serde_json::from_value(json!({ metadata.resource_id_field: id }))
            .map_err(|e| Error::invalid_configuration(metadata.resource_id_field, e.to_string()))?;
        debug!(resource = metadata.resource_name, id, "Importing resource");

        self.read(ctx, &seed)
            .await?
            .ok_or_else(|| Error::not_found(format!("{} {}", metadata.resource_name, id)))
    }
}

/// Value of the metadata's id field within `state`
fn resource_id<S: StateModel>(metadata: &ResourceMetadata, state: &S) -> Result<String> {
    if metadata.resource_id_field == "id" {
        return Ok(state.id().to_string());
    }
    let value = serde_json::to_value(state)?;
    Ok(value
        .get(metadata.resource_id_field)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string())
}

// ============================================================================
// Type-erased Resource
// ============================================================================

/// JSON-in/JSON-out view of a resource driver
#[async_trait]
pub trait DynResource: Send + Sync {
    fn metadata(&self) -> &ResourceMetadata;

    async fn create_json(&self, ctx: &Context, plan: JsonValue) -> Result<JsonValue>;

    async fn read_json(&self, ctx: &Context, state: JsonValue) -> Result<Option<JsonValue>>;

    async fn update_json(
        &self,
        ctx: &Context,
        plan: JsonValue,
        state: JsonValue,
    ) -> Result<JsonValue>;

    async fn delete_json(&self, ctx: &Context, state: JsonValue) -> Result<()>;

    async fn import_json(&self, ctx: &Context, id: &str) -> Result<JsonValue>;
}

fn decode<S: StateModel>(field: &str, document: JsonValue) -> Result<S> {
    serde_json::from_value(document).map_err(|e| Error::invalid_configuration(field, e.to_string()))
}

fn encode<S: StateModel>(state: &S) -> Result<JsonValue> {
    Ok(serde_json::to_value(state)?)
}

#[async_trait]
impl<H: ResourceHandle> DynResource for ResourceDriver<H> {
    fn metadata(&self) -> &ResourceMetadata {
        self.handle.metadata()
    }

    async fn create_json(&self, ctx: &Context, plan: JsonValue) -> Result<JsonValue> {
        let plan: H::State = decode("plan", plan)?;
        encode(&self.create(ctx, plan).await?)
    }

    async fn read_json(&self, ctx: &Context, state: JsonValue) -> Result<Option<JsonValue>> {
        let state: H::State = decode("state", state)?;
        match self.read(ctx, &state).await? {
            Some(refreshed) => encode(&refreshed).map(Some),
            None => Ok(None),
        }
    }

    async fn update_json(
        &self,
        ctx: &Context,
        plan: JsonValue,
        state: JsonValue,
    ) -> Result<JsonValue> {
        let plan: H::State = decode("plan", plan)?;
        let state: H::State = decode("state", state)?;
        encode(&self.update(ctx, plan, &state).await?)
    }

    async fn delete_json(&self, ctx: &Context, state: JsonValue) -> Result<()> {
        let state: H::State = decode("state", state)?;
        self.delete(ctx, &state).await
    }

    async fn import_json(&self, ctx: &Context, id: &str) -> Result<JsonValue> {
        encode(&self.import(ctx, id).await?)
    }
}
