//! Severity-keyed alert channel blocks

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// `alert_channels { warning = [...], critical = [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertChannelsState {
    pub warning: Option<BTreeSet<String>>,
    pub critical: Option<BTreeSet<String>>,
}

impl AlertChannelsState {
    /// Channels keyed by severity; empty levels are left out
    pub fn to_api(&self) -> BTreeMap<Severity, Vec<String>> {
        let mut channels = BTreeMap::new();
        for (severity, ids) in [
            (Severity::Warning, &self.warning),
            (Severity::Critical, &self.critical),
        ] {
            if let Some(ids) = ids.as_ref().filter(|ids| !ids.is_empty()) {
                channels.insert(severity, ids.iter().cloned().collect());
            }
        }
        channels
    }

    /// Same as [`Self::to_api`] keyed by the upper-case severity name
    pub fn to_api_named(&self) -> BTreeMap<String, Vec<String>> {
        self.to_api()
            .into_iter()
            .map(|(severity, ids)| (severity.as_str().to_ascii_uppercase(), ids))
            .collect()
    }

    pub fn from_api(channels: &BTreeMap<Severity, Vec<String>>) -> Option<Self> {
        if channels.is_empty() {
            return None;
        }
        let level = |severity| {
            channels
                .get(&severity)
                .map(|ids: &Vec<String>| ids.iter().cloned().collect::<BTreeSet<_>>())
        };
        Some(Self {
            warning: level(Severity::Warning),
            critical: level(Severity::Critical),
        })
    }

    pub fn from_api_named(channels: &BTreeMap<String, Vec<String>>) -> Option<Self> {
        let keyed: BTreeMap<Severity, Vec<String>> = channels
            .iter()
            .filter_map(|(key, ids)| {
                Severity::parse("alert_channels", key)
                    .ok()
                    .map(|severity| (severity, ids.clone()))
            })
            .collect();
        Self::from_api(&keyed)
    }
}

/// Sorted id set to wire list
pub fn set_to_vec(ids: &BTreeSet<String>) -> Vec<String> {
    ids.iter().cloned().collect()
}

/// Wire list to id set
pub fn vec_to_set(ids: &[String]) -> BTreeSet<String> {
    ids.iter().cloned().collect()
}
