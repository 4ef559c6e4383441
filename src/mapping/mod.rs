//! State <-> API mapping helpers
//!
//! Resource handles translate between the flat state documents the host
//! runtime stores and the typed entities the API exchanges. The pieces that
//! recur across resources live here.

mod alert_channels;
mod custom_payload;
mod one_of;
mod tag_filter;
mod threshold;

pub use alert_channels::{set_to_vec, vec_to_set, AlertChannelsState};
pub use custom_payload::{
    custom_payload_fields_from_api, custom_payload_fields_to_api, CustomPayloadFieldState,
    DynamicValueState,
};
pub use one_of::{is_set, OneOf};
pub use tag_filter::{normalize_tag_filter, tag_filter_from_api, tag_filter_to_api};
pub use threshold::{
    severity_thresholds_from_api, severity_thresholds_to_api, threshold_from_api,
    threshold_to_api, AdaptiveBaselineState, HistoricBaselineState, SeverityThresholdsState,
    StaticThresholdState, ThresholdState, THRESHOLD_OPERATORS,
};

use crate::error::{Error, Result};
use crate::types::Severity;

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Require an attribute that the schema marks mandatory
pub fn require<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::invalid_configuration(field, "attribute is required"))
}

/// Require a non-empty string attribute
pub fn require_str<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::invalid_configuration(field, "attribute must not be empty"));
    }
    Ok(value)
}

/// Check `value` against the allowed set; returns the matching entry
pub fn validate_value<'a>(field: &str, value: &str, allowed: &[&'a str]) -> Result<&'a str> {
    allowed
        .iter()
        .find(|a| **a == value)
        .copied()
        .ok_or_else(|| {
            Error::invalid_configuration(
                field,
                format!("'{value}' is not one of {}", allowed.join(", ")),
            )
        })
}

/// State severity (`warning`/`critical`) to the numeric API value
pub fn severity_to_api(field: &str, value: &str) -> Result<i32> {
    Ok(Severity::parse(field, value)?.api_value())
}

/// Numeric API severity to the state string
pub fn severity_from_api(value: i32) -> Result<String> {
    Ok(Severity::from_api_value(value)?.as_str().to_string())
}

#[cfg(test)]
mod tests;
