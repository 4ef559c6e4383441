//! Generic REST resources
//!
//! A resource combines a base path, a codec and a verb policy into the full
//! CRUD protocol. Verbs never change per call; they are fixed when the
//! resource is constructed.

use super::object::InstanaDataObject;
use super::website_monitoring_config::WebsiteMonitoringConfig;
use crate::codec::{DefaultJsonCodec, JsonCodec};
use crate::error::{Error, Result};
use crate::http::RestClient;
use crate::types::{Context, StringMap};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

/// Verb used to create an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateVerb {
    /// POST to the collection, the server assigns the ID
    Post,
    /// PUT to `{base}/{id}` with a client-side ID
    Put,
}

/// Verb used to update an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateVerb {
    /// POST to `{base}/{id}`
    Post,
    /// PUT to `{base}/{id}`
    Put,
    /// The API offers no update
    Unsupported,
}

/// CRUD protocol over one entity type
#[async_trait]
pub trait RestResource<T: InstanaDataObject>: Send + Sync {
    /// Fetch one entity; 404 surfaces as `NotFound`
    async fn get_one(&self, ctx: &Context, id: &str) -> Result<T>;

    /// Fetch the whole collection
    async fn get_all(&self, ctx: &Context) -> Result<Vec<T>>;

    /// Create the entity and return what the server stored
    async fn create(&self, ctx: &Context, object: &T) -> Result<T>;

    /// Update the entity and return what the server stored
    async fn update(&self, ctx: &Context, object: &T) -> Result<T>;

    /// Delete the entity addressed by its path identity
    async fn delete(&self, ctx: &Context, object: &T) -> Result<()> {
        self.delete_by_id(ctx, object.id_for_path()).await
    }

    /// Delete by identifier; deleting an unknown entity succeeds
    async fn delete_by_id(&self, ctx: &Context, id: &str) -> Result<()>;
}

// ============================================================================
// Default Resource
// ============================================================================

/// Resource driven by a create/update verb policy
pub struct DefaultRestResource<T> {
    name: &'static str,
    path: &'static str,
    create_verb: CreateVerb,
    update_verb: UpdateVerb,
    codec: Arc<dyn JsonCodec<T>>,
    client: Arc<dyn RestClient>,
}

impl<T: InstanaDataObject> DefaultRestResource<T> {
    /// Create a resource with an explicit policy
    pub fn new(
        name: &'static str,
        path: &'static str,
        create_verb: CreateVerb,
        update_verb: UpdateVerb,
        codec: Arc<dyn JsonCodec<T>>,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self {
            name,
            path,
            create_verb,
            update_verb,
            codec,
            client,
        }
    }

    /// PUT to create, PUT to update
    pub fn create_put_update_put(
        name: &'static str,
        path: &'static str,
        codec: Arc<dyn JsonCodec<T>>,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self::new(name, path, CreateVerb::Put, UpdateVerb::Put, codec, client)
    }

    /// POST to create, PUT to update
    pub fn create_post_update_put(
        name: &'static str,
        path: &'static str,
        codec: Arc<dyn JsonCodec<T>>,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self::new(name, path, CreateVerb::Post, UpdateVerb::Put, codec, client)
    }

    /// POST to create, POST to update
    pub fn create_post_update_post(
        name: &'static str,
        path: &'static str,
        codec: Arc<dyn JsonCodec<T>>,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self::new(name, path, CreateVerb::Post, UpdateVerb::Post, codec, client)
    }

    /// POST to create, no update
    pub fn create_post_update_not_supported(
        name: &'static str,
        path: &'static str,
        codec: Arc<dyn JsonCodec<T>>,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self::new(
            name,
            path,
            CreateVerb::Post,
            UpdateVerb::Unsupported,
            codec,
            client,
        )
    }

    /// Resource name used in errors and logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Base path of the collection
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Configured create verb
    pub fn create_verb(&self) -> CreateVerb {
        self.create_verb
    }

    /// Configured update verb
    pub fn update_verb(&self) -> UpdateVerb {
        self.update_verb
    }

    fn decode_response(&self, body: &Bytes, sent: &T) -> Result<T> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(sent.clone());
        }
        self.codec.unmarshal(body)
    }
}

impl<T> std::fmt::Debug for DefaultRestResource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultRestResource")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("create_verb", &self.create_verb)
            .field("update_verb", &self.update_verb)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: InstanaDataObject> RestResource<T> for DefaultRestResource<T> {
    async fn get_one(&self, ctx: &Context, id: &str) -> Result<T> {
        let body = self.client.get_one(ctx, self.path, id).await?;
        self.codec.unmarshal(&body)
    }

    async fn get_all(&self, ctx: &Context) -> Result<Vec<T>> {
        let body = self.client.get(ctx, self.path).await?;
        self.codec.unmarshal_array(&body)
    }

    async fn create(&self, ctx: &Context, object: &T) -> Result<T> {
        let payload = self.codec.marshal(object)?;
        let body = match self.create_verb {
            CreateVerb::Post => self.client.post(ctx, self.path, payload).await?,
            CreateVerb::Put => {
                self.client
                    .put_by_id(ctx, self.path, object.id_for_path(), payload)
                    .await?
            }
        };
        let created = self.decode_response(&body, object)?;
        info!(resource = self.name, id = created.id_for_path(), "created");
        Ok(created)
    }

    async fn update(&self, ctx: &Context, object: &T) -> Result<T> {
        let id = object.id_for_path();
        let body = match self.update_verb {
            UpdateVerb::Unsupported => return Err(Error::operation_not_supported(self.name)),
            UpdateVerb::Put => {
                let payload = self.codec.marshal(object)?;
                self.client.put_by_id(ctx, self.path, id, payload).await?
            }
            UpdateVerb::Post => {
                let payload = self.codec.marshal(object)?;
                self.client.post_by_id(ctx, self.path, id, payload).await?
            }
        };
        let updated = self.decode_response(&body, object)?;
        info!(resource = self.name, id, "updated");
        Ok(updated)
    }

    async fn delete_by_id(&self, ctx: &Context, id: &str) -> Result<()> {
        match self.client.delete(ctx, self.path, id).await {
            Ok(()) => {
                info!(resource = self.name, id, "deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!(resource = self.name, id, "already absent");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

// ============================================================================
// Read-only Resource
// ============================================================================

/// Resource that only supports reads
pub struct ReadOnlyRestResource<T> {
    path: &'static str,
    codec: Arc<dyn JsonCodec<T>>,
    client: Arc<dyn RestClient>,
}

impl<T: InstanaDataObject> ReadOnlyRestResource<T> {
    /// Create a read-only resource
    pub fn new(path: &'static str, codec: Arc<dyn JsonCodec<T>>, client: Arc<dyn RestClient>) -> Self {
        Self {
            path,
            codec,
            client,
        }
    }

    /// Base path of the collection
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Fetch one entity; 404 surfaces as `NotFound`
    pub async fn get_one(&self, ctx: &Context, id: &str) -> Result<T> {
        let body = self.client.get_one(ctx, self.path, id).await?;
        self.codec.unmarshal(&body)
    }

    /// Fetch the whole collection
    pub async fn get_all(&self, ctx: &Context) -> Result<Vec<T>> {
        let body = self.client.get(ctx, self.path).await?;
        self.codec.unmarshal_array(&body)
    }

    /// Fetch the collection filtered by query parameters
    pub async fn get_by_query(&self, ctx: &Context, query: &StringMap) -> Result<Vec<T>> {
        let body = self.client.get_by_query(ctx, self.path, query).await?;
        self.codec.unmarshal_array(&body)
    }
}

impl<T> std::fmt::Debug for ReadOnlyRestResource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadOnlyRestResource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Website Monitoring Config Resource
// ============================================================================

/// Website monitoring configs are created and renamed through the `name`
/// query parameter instead of a body
pub struct WebsiteMonitoringConfigRestResource {
    path: &'static str,
    codec: DefaultJsonCodec<WebsiteMonitoringConfig>,
    client: Arc<dyn RestClient>,
}

impl WebsiteMonitoringConfigRestResource {
    /// Create the resource
    pub fn new(path: &'static str, client: Arc<dyn RestClient>) -> Self {
        Self {
            path,
            codec: DefaultJsonCodec::new(),
            client,
        }
    }

    fn name_query(object: &WebsiteMonitoringConfig) -> StringMap {
        StringMap::from([("name".to_string(), object.name.clone())])
    }
}

impl std::fmt::Debug for WebsiteMonitoringConfigRestResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebsiteMonitoringConfigRestResource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RestResource<WebsiteMonitoringConfig> for WebsiteMonitoringConfigRestResource {
    async fn get_one(&self, ctx: &Context, id: &str) -> Result<WebsiteMonitoringConfig> {
        let body = self.client.get_one(ctx, self.path, id).await?;
        self.codec.unmarshal(&body)
    }

    async fn get_all(&self, ctx: &Context) -> Result<Vec<WebsiteMonitoringConfig>> {
        let body = self.client.get(ctx, self.path).await?;
        self.codec.unmarshal_array(&body)
    }

    async fn create(
        &self,
        ctx: &Context,
        object: &WebsiteMonitoringConfig,
    ) -> Result<WebsiteMonitoringConfig> {
        let body = self
            .client
            .post_by_query(ctx, self.path, &Self::name_query(object))
            .await?;
        self.codec.unmarshal(&body)
    }

    async fn update(
        &self,
        ctx: &Context,
        object: &WebsiteMonitoringConfig,
    ) -> Result<WebsiteMonitoringConfig> {
        let body = self
            .client
            .put_by_query(ctx, self.path, &object.id, &Self::name_query(object))
            .await?;
        self.codec.unmarshal(&body)
    }

    async fn delete_by_id(&self, ctx: &Context, id: &str) -> Result<()> {
        match self.client.delete(ctx, self.path, id).await {
            Err(e) if e.is_not_found() => Ok(()),
            other => other,
        }
    }
}
