//! `instana_automation_action` data source

use super::DataSource;
use crate::error::{Error, Result};
use crate::mapping::require_str;
use crate::restapi::{AutomationAction, InstanaApi, RestResource};
use crate::types::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DATA_SOURCE_NAME: &str = "instana_automation_action";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationActionQuery {
    pub name: String,
    /// Action type, matched case-insensitively
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub struct AutomationActionDataSource {
    resource: Arc<dyn RestResource<AutomationAction>>,
}

impl AutomationActionDataSource {
    pub fn new(api: &InstanaApi) -> Self {
        Self {
            resource: api.automation_actions(),
        }
    }
}

#[async_trait]
impl DataSource for AutomationActionDataSource {
    type Query = AutomationActionQuery;

    fn name(&self) -> &'static str {
        DATA_SOURCE_NAME
    }

    async fn read(&self, ctx: &Context, query: AutomationActionQuery) -> Result<AutomationActionQuery> {
        require_str("name", &query.name)?;
        require_str("type", &query.kind)?;

        let action = self
            .resource
            .get_all(ctx)
            .await?
            .into_iter()
            .find(|a| a.name == query.name && a.kind.eq_ignore_ascii_case(&query.kind))
            .ok_or_else(|| {
                Error::not_found(format!(
                    "automation action '{}' of type '{}'",
                    query.name, query.kind
                ))
            })?;

        Ok(AutomationActionQuery {
            id: Some(action.id),
            description: Some(action.description.unwrap_or_default()),
            tags: (!action.tags.is_empty()).then_some(action.tags),
            name: action.name,
            kind: action.kind,
        })
    }
}
