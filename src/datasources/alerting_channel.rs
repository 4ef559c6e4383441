//! `instana_alerting_channel` data source
//!
//! Looks a channel up by name and reports it in the same block layout the
//! `instana_alerting_channel` resource stores.

use super::DataSource;
use crate::error::{Error, Result};
use crate::mapping::require_str;
use crate::resources::alerting_channel::{AlertingChannelResource, AlertingChannelState};
use crate::resources::ResourceHandle;
use crate::restapi::{AlertingChannel, InstanaApi, RestResource};
use crate::types::Context;
use async_trait::async_trait;
use std::sync::Arc;

pub const DATA_SOURCE_NAME: &str = "instana_alerting_channel";

pub struct AlertingChannelDataSource {
    resource: Arc<dyn RestResource<AlertingChannel>>,
    handle: AlertingChannelResource,
}

impl AlertingChannelDataSource {
    pub fn new(api: &InstanaApi) -> Self {
        Self {
            resource: api.alerting_channels(),
            handle: AlertingChannelResource::new(),
        }
    }
}

#[async_trait]
impl DataSource for AlertingChannelDataSource {
    type Query = AlertingChannelState;

    fn name(&self) -> &'static str {
        DATA_SOURCE_NAME
    }

    async fn read(&self, ctx: &Context, query: AlertingChannelState) -> Result<AlertingChannelState> {
        require_str("name", &query.name)?;

        let channel = self
            .resource
            .get_all(ctx)
            .await?
            .into_iter()
            .find(|c| c.name == query.name)
            .ok_or_else(|| Error::not_found(format!("alerting channel '{}'", query.name)))?;

        self.handle.update_state(&channel, None)
    }
}
