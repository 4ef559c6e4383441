//! Resource handle contract
//!
//! A handle binds one state schema to one API entity: it names the REST
//! resource to use and translates between the two shapes. The driver in
//! [`super::driver`] runs the lifecycle on top of it.

use crate::error::Result;
use crate::restapi::{InstanaApi, InstanaDataObject, RestResource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

// ============================================================================
// Metadata
// ============================================================================

/// Static description of a resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceMetadata {
    /// Type name addressed by the host runtime (`instana_*`)
    pub resource_name: &'static str,

    /// Version of the state schema
    pub schema_version: u32,

    /// Keep the id from the API instead of generating one before create
    pub skip_id_generation: bool,

    /// State field holding the identifier used for reads
    pub resource_id_field: &'static str,

    /// Every change forces a replacement
    pub create_only: bool,
}

impl ResourceMetadata {
    /// Metadata with the defaults: generated ids read back through `id`
    pub fn new(resource_name: &'static str, schema_version: u32) -> Self {
        Self {
            resource_name,
            schema_version,
            skip_id_generation: false,
            resource_id_field: "id",
            create_only: false,
        }
    }

    pub fn skip_id_generation(mut self) -> Self {
        self.skip_id_generation = true;
        self
    }

    pub fn resource_id_field(mut self, field: &'static str) -> Self {
        self.resource_id_field = field;
        self
    }

    pub fn create_only(mut self) -> Self {
        self.create_only = true;
        self
    }
}

// ============================================================================
// State Model
// ============================================================================

/// State document persisted by the host runtime
pub trait StateModel: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static {
    /// Resource id
    fn id(&self) -> &str;

    /// Replace the resource id
    fn set_id(&mut self, id: String);
}

/// Implements [`StateModel`] over an `id` field
macro_rules! state_with_id {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::resources::StateModel for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )+
    };
}

pub(crate) use state_with_id;

// ============================================================================
// Handle
// ============================================================================

/// Per-resource binding between a state schema and an API entity
pub trait ResourceHandle: Send + Sync + 'static {
    type State: StateModel;
    type Api: InstanaDataObject;

    fn metadata(&self) -> &ResourceMetadata;

    /// REST resource the lifecycle runs against
    fn rest_resource(&self, api: &InstanaApi) -> Arc<dyn RestResource<Self::Api>>;

    /// Fill fields the provider computes before the first create
    fn set_computed_fields(&self, _plan: &mut Self::State) -> Result<()> {
        Ok(())
    }

    /// Copy server-assigned fields from the stored state into an update plan
    fn graft_state(&self, plan: &mut Self::State, state: &Self::State) {
        plan.set_id(state.id().to_string());
    }

    /// Plan or state to wire entity
    fn map_state_to_api(&self, state: &Self::State) -> Result<Self::Api>;

    /// Wire entity to state; `previous` is the plan or stored state, if any
    fn update_state(&self, object: &Self::Api, previous: Option<&Self::State>) -> Result<Self::State>;
}
