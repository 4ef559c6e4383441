//! `instana_host_agents`

use super::DataSource;
use crate::error::Result;
use crate::restapi::{HostAgent, InstanaApi, ReadOnlyRestResource};
use crate::types::{Context, StringMap};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DATA_SOURCE_NAME: &str = "instana_host_agents";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostAgentsQuery {
    /// Dynamic focus query, e.g. `entity.host.name:web-*`
    pub filter: String,
    pub items: Vec<HostAgentItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostAgentItem {
    pub snapshot_id: String,
    pub label: String,
    pub host: String,
    pub plugin: String,
    pub tags: Vec<String>,
}

impl From<HostAgent> for HostAgentItem {
    fn from(agent: HostAgent) -> Self {
        Self {
            snapshot_id: agent.snapshot_id,
            label: agent.label,
            host: agent.host,
            plugin: agent.plugin,
            tags: agent.tags,
        }
    }
}

pub struct HostAgentsDataSource {
    resource: ReadOnlyRestResource<HostAgent>,
}

impl HostAgentsDataSource {
    pub fn new(api: &InstanaApi) -> Self {
        Self {
            resource: api.host_agents(),
        }
    }
}

#[async_trait]
impl DataSource for HostAgentsDataSource {
    type Query = HostAgentsQuery;

    fn name(&self) -> &'static str {
        DATA_SOURCE_NAME
    }

    async fn read(&self, ctx: &Context, query: HostAgentsQuery) -> Result<HostAgentsQuery> {
        let params = StringMap::from([("query".to_string(), query.filter.clone())]);
        let agents = self.resource.get_by_query(ctx, &params).await?;
        debug!(filter = %query.filter, count = agents.len(), "Resolved host agents");
        Ok(HostAgentsQuery {
            filter: query.filter,
            items: agents.into_iter().map(HostAgentItem::from).collect(),
        })
    }
}
