//! `instana_builtin_event_spec`

use super::DataSource;
use crate::error::{Error, Result};
use crate::mapping::{require_str, severity_from_api};
use crate::restapi::{BuiltinEventSpecification, InstanaApi, ReadOnlyRestResource};
use crate::types::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DATA_SOURCE_NAME: &str = "instana_builtin_event_spec";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuiltinEventSpecQuery {
    pub name: String,
    pub short_plugin_id: String,
    pub id: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub triggering: Option<bool>,
    pub enabled: Option<bool>,
}

pub struct BuiltinEventSpecDataSource {
    resource: ReadOnlyRestResource<BuiltinEventSpecification>,
}

impl BuiltinEventSpecDataSource {
    pub fn new(api: &InstanaApi) -> Self {
        Self {
            resource: api.builtin_event_specifications(),
        }
    }
}

#[async_trait]
impl DataSource for BuiltinEventSpecDataSource {
    type Query = BuiltinEventSpecQuery;

    fn name(&self) -> &'static str {
        DATA_SOURCE_NAME
    }

    async fn read(&self, ctx: &Context, query: BuiltinEventSpecQuery) -> Result<BuiltinEventSpecQuery> {
        require_str("name", &query.name)?;
        require_str("short_plugin_id", &query.short_plugin_id)?;

        let spec = self
            .resource
            .get_all(ctx)
            .await?
            .into_iter()
            .find(|s| s.name == query.name && s.short_plugin_id == query.short_plugin_id)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "built-in event specification '{}' for plugin '{}'",
                    query.name, query.short_plugin_id
                ))
            })?;

        Ok(BuiltinEventSpecQuery {
            severity: Some(severity_from_api(spec.severity)?),
            id: Some(spec.id),
            description: spec.description,
            triggering: Some(spec.triggering),
            enabled: Some(spec.enabled),
            name: spec.name,
            short_plugin_id: spec.short_plugin_id,
        })
    }
}
