//! Common types used throughout the provider
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Ordered string map, used for headers, custom properties and query parameters
pub type StringMap = BTreeMap<String, String>;

// ============================================================================
// Operation Context
// ============================================================================

/// Ambient context threaded through every public async entry.
///
/// Cancelling the context aborts in-flight requests; the aborted call
/// returns [`Error::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
}

impl Context {
    /// Create a fresh, uncancelled context
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing cancellation token
    pub fn with_token(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Derive a child context that is cancelled together with this one
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Cancel this context and all its children
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check whether the context was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Future that resolves once the context is cancelled
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Fail fast when the context is already cancelled
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Severity
// ============================================================================

/// Alert severity.
///
/// The API encodes severities as integers (5, 10) on alert configs and as
/// upper-case keys (`WARNING`, `CRITICAL`) inside threshold and channel maps.
/// State documents use the lower-case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    /// Integer representation used by the API
    pub fn api_value(self) -> i32 {
        match self {
            Severity::Warning => 5,
            Severity::Critical => 10,
        }
    }

    /// Parse the integer representation used by the API
    pub fn from_api_value(value: i32) -> Result<Self> {
        match value {
            5 => Ok(Severity::Warning),
            10 => Ok(Severity::Critical),
            other => Err(Error::malformed(format!(
                "{other} is not a valid severity"
            ))),
        }
    }

    /// Name used in state documents
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Parse the state representation
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(Error::invalid_configuration(
                field,
                format!("{other} is not a valid severity, expected warning or critical"),
            )),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_api_values() {
        assert_eq!(Severity::Warning.api_value(), 5);
        assert_eq!(Severity::Critical.api_value(), 10);
        assert_eq!(Severity::from_api_value(10).unwrap(), Severity::Critical);
        assert!(Severity::from_api_value(7).is_err());
    }

    #[test]
    fn test_severity_parse_state_value() {
        assert_eq!(Severity::parse("severity", "warning").unwrap(), Severity::Warning);
        assert_eq!(Severity::parse("severity", "CRITICAL").unwrap(), Severity::Critical);
        let err = Severity::parse("severity", "info").unwrap_err();
        assert!(err.to_string().contains("'severity'"));
    }

    #[test]
    fn test_severity_map_keys() {
        let mut map = BTreeMap::new();
        map.insert(Severity::Critical, 1);
        map.insert(Severity::Warning, 2);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"WARNING":2,"CRITICAL":1}"#);
    }

    #[test]
    fn test_context_cancellation() {
        let ctx = Context::new();
        let child = ctx.child();
        assert!(ctx.check().is_ok());
        ctx.cancel();
        assert!(child.is_cancelled());
        assert!(matches!(child.check(), Err(Error::Cancelled)));
    }
}
