//! Data sources
//!
//! Read-only lookups the host runtime evaluates during planning. Each data
//! source takes a query document and returns the document with its computed
//! attributes filled in.

mod alerting_channel;
mod automation_action;
mod builtin_event_spec;
mod custom_event_specification;
mod host_agents;
mod synthetic_location;

pub use alerting_channel::AlertingChannelDataSource;
pub use automation_action::{AutomationActionDataSource, AutomationActionQuery};
pub use builtin_event_spec::{BuiltinEventSpecDataSource, BuiltinEventSpecQuery};
pub use custom_event_specification::{
    CustomEventSpecificationDataSource, CustomEventSpecificationQuery,
};
pub use host_agents::{HostAgentItem, HostAgentsDataSource, HostAgentsQuery};
pub use synthetic_location::{SyntheticLocationDataSource, SyntheticLocationQuery};

use crate::error::{Error, Result};
use crate::restapi::InstanaApi;
use crate::types::{Context, JsonValue};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Typed data source lookup
#[async_trait]
pub trait DataSource: Send + Sync {
    type Query: Serialize + DeserializeOwned + Send + Sync;

    fn name(&self) -> &'static str;

    /// Resolve the query against the API
    async fn read(&self, ctx: &Context, query: Self::Query) -> Result<Self::Query>;
}

/// JSON-in/JSON-out view of a data source
#[async_trait]
pub trait DynDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn read_json(&self, ctx: &Context, query: JsonValue) -> Result<JsonValue>;
}

#[async_trait]
impl<D: DataSource> DynDataSource for D {
    fn name(&self) -> &'static str {
        DataSource::name(self)
    }

    async fn read_json(&self, ctx: &Context, query: JsonValue) -> Result<JsonValue> {
        let query: D::Query = serde_json::from_value(query)
            .map_err(|e| Error::invalid_configuration("query", e.to_string()))?;
        Ok(serde_json::to_value(self.read(ctx, query).await?)?)
    }
}

/// Every data source the provider serves, bound to `api`
pub fn all_data_sources(api: &InstanaApi) -> Vec<Arc<dyn DynDataSource>> {
    vec![
        Arc::new(AlertingChannelDataSource::new(api)),
        Arc::new(AutomationActionDataSource::new(api)),
        Arc::new(BuiltinEventSpecDataSource::new(api)),
        Arc::new(CustomEventSpecificationDataSource::new(api)),
        Arc::new(HostAgentsDataSource::new(api)),
        Arc::new(SyntheticLocationDataSource::new(api)),
    ]
}

#[cfg(test)]
mod tests;
