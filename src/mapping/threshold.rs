//! Threshold blocks
//!
//! State documents hold a threshold as one of `static`, `adaptive_baseline`
//! or `historic_baseline`; severity-keyed thresholds as `warning` and
//! `critical` siblings.

use super::one_of::OneOf;
use super::{round_to, validate_value};
use crate::error::{Error, Result};
use crate::restapi::{Seasonality, SeverityThresholds, Threshold};
use crate::types::Severity;
use serde::{Deserialize, Serialize};

/// Operators accepted on thresholds
pub const THRESHOLD_OPERATORS: &[&str] = &[">", ">=", "<", "<="];

const SEASONALITIES: &[&str] = &["DAILY", "WEEKLY"];

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdState {
    #[serde(rename = "static")]
    pub static_threshold: Option<StaticThresholdState>,
    pub adaptive_baseline: Option<AdaptiveBaselineState>,
    pub historic_baseline: Option<HistoricBaselineState>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticThresholdState {
    pub operator: Option<String>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveBaselineState {
    pub operator: Option<String>,
    pub deviation_factor: Option<f64>,
    pub adaptability: Option<f64>,
    pub seasonality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricBaselineState {
    pub operator: Option<String>,
    pub deviation_factor: Option<f64>,
    pub seasonality: Option<String>,
    pub baseline: Option<Vec<Vec<f64>>>,
}

/// `warning` and `critical` threshold blocks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholdsState {
    pub warning: Option<ThresholdState>,
    pub critical: Option<ThresholdState>,
}

// ============================================================================
// State -> API
// ============================================================================

/// Map a threshold block group
pub fn threshold_to_api(field: &str, state: &ThresholdState) -> Result<Threshold> {
    OneOf::new(field)
        .variant("static", state.static_threshold.as_ref(), |s| {
            static_to_api(&format!("{field}.static"), s)
        })
        .variant("adaptive_baseline", state.adaptive_baseline.as_ref(), |s| {
            adaptive_to_api(&format!("{field}.adaptive_baseline"), s)
        })
        .variant("historic_baseline", state.historic_baseline.as_ref(), |s| {
            historic_to_api(&format!("{field}.historic_baseline"), s)
        })
        .required()
}

fn operator_to_api(field: &str, operator: Option<&String>) -> Result<Option<String>> {
    operator
        .map(|op| validate_value(&format!("{field}.operator"), op, THRESHOLD_OPERATORS).map(str::to_string))
        .transpose()
}

fn seasonality_to_api(field: &str, seasonality: Option<&String>) -> Result<Option<Seasonality>> {
    seasonality
        .map(|s| {
            Seasonality::parse(s).ok_or_else(|| {
                Error::invalid_configuration(
                    format!("{field}.seasonality"),
                    format!("'{s}' is not one of {}", SEASONALITIES.join(", ")),
                )
            })
        })
        .transpose()
}

fn static_to_api(field: &str, state: &StaticThresholdState) -> Result<Threshold> {
    let value = state.value.ok_or_else(|| {
        Error::invalid_configuration(format!("{field}.value"), "value is required")
    })?;
    Ok(Threshold::Static {
        operator: operator_to_api(field, state.operator.as_ref())?,
        value: Some(round_to(value, 2)),
        last_updated: None,
    })
}

fn adaptive_to_api(field: &str, state: &AdaptiveBaselineState) -> Result<Threshold> {
    Ok(Threshold::AdaptiveBaseline {
        operator: operator_to_api(field, state.operator.as_ref())?,
        deviation_factor: state.deviation_factor,
        adaptability: state.adaptability,
        seasonality: seasonality_to_api(field, state.seasonality.as_ref())?,
    })
}

fn historic_to_api(field: &str, state: &HistoricBaselineState) -> Result<Threshold> {
    Ok(Threshold::HistoricBaseline {
        operator: operator_to_api(field, state.operator.as_ref())?,
        deviation_factor: state.deviation_factor,
        seasonality: seasonality_to_api(field, state.seasonality.as_ref())?,
        baseline: state.baseline.clone(),
    })
}

/// Map `warning`/`critical` blocks; at least one must be set
pub fn severity_thresholds_to_api(
    field: &str,
    state: &SeverityThresholdsState,
) -> Result<SeverityThresholds> {
    let mut thresholds = SeverityThresholds::new();
    if let Some(warning) = state.warning.as_ref() {
        thresholds.insert(
            Severity::Warning,
            threshold_to_api(&format!("{field}.warning"), warning)?,
        );
    }
    if let Some(critical) = state.critical.as_ref() {
        thresholds.insert(
            Severity::Critical,
            threshold_to_api(&format!("{field}.critical"), critical)?,
        );
    }
    if thresholds.is_empty() {
        return Err(Error::invalid_configuration(
            field,
            "at least one of warning, critical must be set",
        ));
    }
    Ok(thresholds)
}

// ============================================================================
// API -> State
// ============================================================================

/// Map a wire threshold into its block group
pub fn threshold_from_api(threshold: &Threshold) -> ThresholdState {
    match threshold {
        Threshold::Static {
            operator, value, ..
        } => ThresholdState {
            static_threshold: Some(StaticThresholdState {
                operator: operator.clone(),
                value: *value,
            }),
            ..Default::default()
        },
        Threshold::AdaptiveBaseline {
            operator,
            deviation_factor,
            adaptability,
            seasonality,
        } => ThresholdState {
            adaptive_baseline: Some(AdaptiveBaselineState {
                operator: operator.clone(),
                deviation_factor: deviation_factor.map(|v| round_to(v, 4)),
                adaptability: adaptability.map(|v| round_to(v, 4)),
                seasonality: seasonality.map(|s| s.as_str().to_string()),
            }),
            ..Default::default()
        },
        Threshold::HistoricBaseline {
            operator,
            deviation_factor,
            seasonality,
            baseline,
        } => ThresholdState {
            historic_baseline: Some(HistoricBaselineState {
                operator: operator.clone(),
                deviation_factor: deviation_factor.map(|v| round_to(v, 4)),
                seasonality: seasonality.map(|s| s.as_str().to_string()),
                baseline: baseline.clone(),
            }),
            ..Default::default()
        },
    }
}

/// Map severity-keyed thresholds into `warning`/`critical` blocks
pub fn severity_thresholds_from_api(thresholds: &SeverityThresholds) -> SeverityThresholdsState {
    SeverityThresholdsState {
        warning: thresholds.get(&Severity::Warning).map(threshold_from_api),
        critical: thresholds.get(&Severity::Critical).map(threshold_from_api),
    }
}
