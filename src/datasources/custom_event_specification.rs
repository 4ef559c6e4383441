//! `instana_custom_event_specification` data source

use super::DataSource;
use crate::error::{Error, Result};
use crate::mapping::require_str;
use crate::restapi::{CustomEventSpecification, InstanaApi, RestResource};
use crate::types::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DATA_SOURCE_NAME: &str = "instana_custom_event_specification";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomEventSpecificationQuery {
    pub name: String,
    pub entity_type: String,
    pub id: Option<String>,
    pub description: Option<String>,
    pub query: Option<String>,
    pub triggering: Option<bool>,
    pub enabled: Option<bool>,
    pub expiration_time: Option<i64>,
}

pub struct CustomEventSpecificationDataSource {
    resource: Arc<dyn RestResource<CustomEventSpecification>>,
}

impl CustomEventSpecificationDataSource {
    pub fn new(api: &InstanaApi) -> Self {
        Self {
            resource: api.custom_event_specifications(),
        }
    }
}

#[async_trait]
impl DataSource for CustomEventSpecificationDataSource {
    type Query = CustomEventSpecificationQuery;

    fn name(&self) -> &'static str {
        DATA_SOURCE_NAME
    }

    async fn read(
        &self,
        ctx: &Context,
        query: CustomEventSpecificationQuery,
    ) -> Result<CustomEventSpecificationQuery> {
        require_str("name", &query.name)?;
        require_str("entity_type", &query.entity_type)?;

        let spec = self
            .resource
            .get_all(ctx)
            .await?
            .into_iter()
            .find(|s| s.name == query.name && s.entity_type == query.entity_type)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "custom event specification '{}' for entity type '{}'",
                    query.name, query.entity_type
                ))
            })?;

        Ok(CustomEventSpecificationQuery {
            id: Some(spec.id),
            description: spec.description,
            query: spec.query,
            triggering: Some(spec.triggering),
            enabled: Some(spec.enabled),
            expiration_time: spec.expiration_time,
            name: spec.name,
            entity_type: spec.entity_type,
        })
    }
}
