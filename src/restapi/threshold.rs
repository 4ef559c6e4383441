//! Threshold wire forms shared by the alert configs

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seasonality of a baseline threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Seasonality {
    Daily,
    Weekly,
}

impl Seasonality {
    pub fn as_str(self) -> &'static str {
        match self {
            Seasonality::Daily => "DAILY",
            Seasonality::Weekly => "WEEKLY",
        }
    }

    /// Parse the state representation, case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "DAILY" => Some(Seasonality::Daily),
            "WEEKLY" => Some(Seasonality::Weekly),
            _ => None,
        }
    }
}

/// Threshold variant, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Threshold {
    #[serde(rename = "staticThreshold", rename_all = "camelCase")]
    Static {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operator: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_updated: Option<i64>,
    },
    #[serde(rename = "adaptiveBaseline", rename_all = "camelCase")]
    AdaptiveBaseline {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operator: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deviation_factor: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        adaptability: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seasonality: Option<Seasonality>,
    },
    #[serde(rename = "historicBaseline", rename_all = "camelCase")]
    HistoricBaseline {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operator: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deviation_factor: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seasonality: Option<Seasonality>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        baseline: Option<Vec<Vec<f64>>>,
    },
}

impl Threshold {
    /// Static threshold with operator and value
    pub fn static_threshold(operator: impl Into<String>, value: f64) -> Self {
        Self::Static {
            operator: Some(operator.into()),
            value: Some(value),
            last_updated: None,
        }
    }

    /// Wire discriminator
    pub fn type_name(&self) -> &'static str {
        match self {
            Threshold::Static { .. } => "staticThreshold",
            Threshold::AdaptiveBaseline { .. } => "adaptiveBaseline",
            Threshold::HistoricBaseline { .. } => "historicBaseline",
        }
    }
}

/// Severity-keyed thresholds
pub type SeverityThresholds = BTreeMap<Severity, Threshold>;

/// Rule aggregated with its operator and severity-keyed thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleWithThreshold<R> {
    pub threshold_operator: String,
    pub rule: R,
    #[serde(default)]
    pub thresholds: SeverityThresholds,
}
