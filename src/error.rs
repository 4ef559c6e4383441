//! Error types for the Instana provider
//!
//! This module defines the error hierarchy for the entire provider.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Every variant reports exactly one [`ErrorKind`], which is what callers
//! branch on.

use thiserror::Error;

/// Classified kind of an error, independent of where it was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The remote entity does not exist
    NotFound,
    /// The API token lacks the permission for the call
    PermissionDenied,
    /// The remote state conflicts with the request
    Conflict,
    /// The request was rejected, or failed client-side validation
    InvalidRequest,
    /// Server failure, timeout, connection reset or cancellation
    Transient,
    /// Unparseable JSON, unexpected document shape or invalid filter syntax
    Malformed,
    /// Update called on a resource without an update verb
    OperationNotSupported,
    /// Provider bootstrap failure
    Configuration,
}

impl ErrorKind {
    /// Stable name used in CLI and server output
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::Transient => "Transient",
            ErrorKind::Malformed => "Malformed",
            ErrorKind::OperationNotSupported => "OperationNotSupported",
            ErrorKind::Configuration => "Configuration",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The main error type for the Instana provider
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("Resource not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied (HTTP {status}): {body}")]
    PermissionDenied { status: u16, body: String },

    #[error("Conflict (HTTP 409): {body}")]
    Conflict { body: String },

    #[error("Request rejected (HTTP {status}): {body}")]
    InvalidRequest { status: u16, body: String },

    #[error("Server error (HTTP {status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Codec Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Malformed document: {message}")]
    Malformed { message: String },

    // ============================================================================
    // Tag Filter Errors
    // ============================================================================
    #[error("Invalid tag filter at offset {offset}: {message}")]
    TagFilter { offset: usize, message: String },

    // ============================================================================
    // Mapping Errors
    // ============================================================================
    #[error("Invalid configuration of '{field}': {message}")]
    InvalidConfiguration { field: String, message: String },

    // ============================================================================
    // Resource Protocol Errors
    // ============================================================================
    #[error("update operations not supported for {resource} resources")]
    OperationNotSupported { resource: String },

    #[error("Unknown resource type: {name}")]
    UnknownResource { name: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a not found error for the given path
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a malformed document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Create a tag filter syntax error
    pub fn tag_filter(offset: usize, message: impl Into<String>) -> Self {
        Self::TagFilter {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid configuration error naming the offending field path
    pub fn invalid_configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an operation not supported error
    pub fn operation_not_supported(resource: impl Into<String>) -> Self {
        Self::OperationNotSupported {
            resource: resource.into(),
        }
    }

    /// Build the error for a non-2xx HTTP response
    pub fn from_status(status: u16, path: &str, body: impl Into<String>) -> Self {
        let body = body.into();
        match classify_status(status) {
            Some(ErrorKind::NotFound) => Self::not_found(path),
            Some(ErrorKind::PermissionDenied) => Self::PermissionDenied { status, body },
            Some(ErrorKind::Conflict) => Self::Conflict { body },
            Some(ErrorKind::Transient) => Self::ServerError { status, body },
            _ => Self::InvalidRequest { status, body },
        }
    }

    /// Classified kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::YamlParse(_)
            | Error::InvalidUrl(_)
            | Error::UnknownResource { .. }
            | Error::Io(_) => ErrorKind::Configuration,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Error::Conflict { .. } => ErrorKind::Conflict,
            Error::InvalidRequest { .. } | Error::InvalidConfiguration { .. } => {
                ErrorKind::InvalidRequest
            }
            Error::ServerError { .. } | Error::Timeout { .. } | Error::Cancelled => {
                ErrorKind::Transient
            }
            Error::Http(e) => {
                if e.is_decode() {
                    ErrorKind::Malformed
                } else {
                    ErrorKind::Transient
                }
            }
            Error::JsonParse(_) | Error::Malformed { .. } | Error::TagFilter { .. } => {
                ErrorKind::Malformed
            }
            Error::OperationNotSupported { .. } => ErrorKind::OperationNotSupported,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// Check if this error is the distinguished not found kind
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Error::Cancelled) && self.kind() == ErrorKind::Transient
    }
}

/// Classify an HTTP status code; `None` for success codes
pub fn classify_status(status: u16) -> Option<ErrorKind> {
    match status {
        200..=299 => None,
        404 => Some(ErrorKind::NotFound),
        401 | 403 => Some(ErrorKind::PermissionDenied),
        409 => Some(ErrorKind::Conflict),
        500..=599 => Some(ErrorKind::Transient),
        _ => Some(ErrorKind::InvalidRequest),
    }
}

/// Result type alias for the Instana provider
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Context {
                message: format!("{}: {}", message.into(), inner),
                source: Box::new(inner),
            }
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Context {
                message: format!("{}: {}", f(), inner),
                source: Box::new(inner),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("api_token");
        assert_eq!(err.to_string(), "Missing required config field: api_token");

        let err = Error::operation_not_supported("instana_sli_config");
        assert_eq!(
            err.to_string(),
            "update operations not supported for instana_sli_config resources"
        );

        let err = Error::invalid_configuration("rule", "exactly one of slowness, throughput");
        assert_eq!(
            err.to_string(),
            "Invalid configuration of 'rule': exactly one of slowness, throughput"
        );
    }

    #[test_case(200, None ; "ok")]
    #[test_case(204, None ; "no content")]
    #[test_case(400, Some(ErrorKind::InvalidRequest) ; "bad request")]
    #[test_case(401, Some(ErrorKind::PermissionDenied) ; "unauthorized")]
    #[test_case(403, Some(ErrorKind::PermissionDenied) ; "forbidden")]
    #[test_case(404, Some(ErrorKind::NotFound) ; "not found")]
    #[test_case(409, Some(ErrorKind::Conflict) ; "conflict")]
    #[test_case(422, Some(ErrorKind::InvalidRequest) ; "unprocessable")]
    #[test_case(429, Some(ErrorKind::InvalidRequest) ; "too many requests")]
    #[test_case(500, Some(ErrorKind::Transient) ; "internal error")]
    #[test_case(503, Some(ErrorKind::Transient) ; "unavailable")]
    fn test_classify_status(status: u16, expected: Option<ErrorKind>) {
        assert_eq!(classify_status(status), expected);
    }

    #[test]
    fn test_from_status_kinds() {
        assert_eq!(
            Error::from_status(404, "/api/x/1", "").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::from_status(403, "/api/x", "denied").kind(),
            ErrorKind::PermissionDenied
        );
        assert_eq!(Error::from_status(409, "/api/x", "").kind(), ErrorKind::Conflict);
        assert_eq!(
            Error::from_status(422, "/api/x", "").kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(Error::from_status(502, "/api/x", "").kind(), ErrorKind::Transient);
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::from_status(500, "/", "").is_retryable());
        assert!(Error::from_status(503, "/", "").is_retryable());

        assert!(!Error::Cancelled.is_retryable());
        assert!(!Error::from_status(400, "/", "").is_retryable());
        assert!(!Error::from_status(401, "/", "").is_retryable());
        assert!(!Error::from_status(404, "/", "").is_retryable());
        assert!(!Error::malformed("bad").is_retryable());
        assert!(!Error::invalid_configuration("x", "y").is_retryable());
    }

    #[test]
    fn test_invalid_configuration_is_invalid_request() {
        let err = Error::invalid_configuration("threshold", "missing");
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_result_context_keeps_kind() {
        let result: Result<()> = Err(Error::not_found("/api/settings/api-tokens/1"));
        let with_context = result.context("reading api token");
        let err = with_context.unwrap_err();
        assert!(err
            .to_string()
            .contains("reading api token: Resource not found"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
