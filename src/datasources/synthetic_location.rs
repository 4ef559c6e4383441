//! `instana_synthetic_location`

use super::DataSource;
use crate::error::{Error, Result};
use crate::restapi::{InstanaApi, ReadOnlyRestResource, SyntheticLocation};
use crate::types::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DATA_SOURCE_NAME: &str = "instana_synthetic_location";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticLocationQuery {
    pub id: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub location_type: Option<String>,
}

impl SyntheticLocationQuery {
    fn matches(&self, location: &SyntheticLocation) -> bool {
        self.label.as_ref().map_or(true, |l| *l == location.label)
            && self
                .location_type
                .as_ref()
                .map_or(true, |t| *t == location.location_type)
    }
}

pub struct SyntheticLocationDataSource {
    resource: ReadOnlyRestResource<SyntheticLocation>,
}

impl SyntheticLocationDataSource {
    pub fn new(api: &InstanaApi) -> Self {
        Self {
            resource: api.synthetic_locations(),
        }
    }
}

#[async_trait]
impl DataSource for SyntheticLocationDataSource {
    type Query = SyntheticLocationQuery;

    fn name(&self) -> &'static str {
        DATA_SOURCE_NAME
    }

    async fn read(&self, ctx: &Context, query: SyntheticLocationQuery) -> Result<SyntheticLocationQuery> {
        if query.label.is_none() && query.location_type.is_none() {
            return Err(Error::invalid_configuration(
                "label",
                "at least one of label, location_type must be set",
            ));
        }

        let mut matches: Vec<SyntheticLocation> = self
            .resource
            .get_all(ctx)
            .await?
            .into_iter()
            .filter(|l| query.matches(l))
            .collect();

        match matches.len() {
            0 => Err(Error::not_found("no synthetic location matches the query")),
            1 => {
                let location = matches.remove(0);
                Ok(SyntheticLocationQuery {
                    id: Some(location.id),
                    label: Some(location.label),
                    description: Some(location.description),
                    location_type: Some(location.location_type),
                })
            }
            n => Err(Error::invalid_configuration(
                "label",
                format!("{n} synthetic locations match the query, expected exactly one"),
            )),
        }
    }
}
