//! Provider configuration
//!
//! The provider is configured once per process with an API token, the tenant
//! endpoint and the TLS verification switch. Values are read from a YAML file,
//! then from the environment, then from explicit overrides, each layer
//! replacing what the previous one set.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Environment variable holding the API token
pub const ENV_API_TOKEN: &str = "INSTANA_API_TOKEN";
/// Environment variable holding the endpoint
pub const ENV_ENDPOINT: &str = "INSTANA_ENDPOINT";
/// Environment variable holding the TLS verification switch
pub const ENV_TLS_SKIP_VERIFY: &str = "INSTANA_TLS_SKIP_VERIFY";

/// host[:port], no scheme and no path
static ENDPOINT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9.-]*[A-Za-z0-9])?(:[0-9]{1,5})?$")
        .unwrap_or_else(|e| panic!("Invalid endpoint regex: {e}"))
});

// ============================================================================
// Provider Config
// ============================================================================

/// Process-wide provider settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API token sent as `Authorization: apiToken <token>`
    #[serde(default)]
    pub api_token: String,

    /// Tenant host and optional port, HTTPS is implied
    #[serde(default)]
    pub endpoint: String,

    /// Disable server certificate verification
    #[serde(default)]
    pub tls_skip_verify: bool,

    /// Transport tuning
    #[serde(default)]
    pub http: HttpSettings,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("tls_skip_verify", &self.tls_skip_verify)
            .field("http", &self.http)
            .finish()
    }
}

/// Optional transport tuning, all fields fall back to the client defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Total attempts for retryable requests
    #[serde(default)]
    pub max_attempts: Option<u32>,

    /// Write requests per second
    #[serde(default)]
    pub writes_per_second: Option<u32>,
}

impl ProviderConfig {
    /// Create a config from explicit values
    pub fn new(api_token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set the TLS verification switch
    #[must_use]
    pub fn tls_skip_verify(mut self, skip: bool) -> Self {
        self.tls_skip_verify = skip;
        self
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Overlay values from the process environment
    #[must_use]
    pub fn merge_env(self) -> Self {
        self.merge_from(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup
    #[must_use]
    pub fn merge_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.is_empty()) {
            self.api_token = token;
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(skip) = lookup(ENV_TLS_SKIP_VERIFY) {
            self.tls_skip_verify = matches!(skip.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    /// Check that all required settings are present and well-formed
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::missing_field("api_token"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(Error::missing_field("endpoint"));
        }
        if self.endpoint.contains("://") {
            return Err(Error::config(format!(
                "endpoint '{}' must not contain a scheme, HTTPS is implied",
                self.endpoint
            )));
        }
        if !ENDPOINT_REGEX.is_match(&self.endpoint) {
            return Err(Error::config(format!(
                "endpoint '{}' is not a valid host[:port]",
                self.endpoint
            )));
        }
        url::Url::parse(&self.base_url())?;
        Ok(())
    }

    /// Base URL derived from the endpoint
    pub fn base_url(&self) -> String {
        format!("https://{}", self.endpoint)
    }

    /// Transport configuration for this provider config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url())
            .api_token(&self.api_token)
            .tls_skip_verify(self.tls_skip_verify);

        if let Some(seconds) = self.http.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        if let Some(attempts) = self.http.max_attempts {
            builder = builder.max_attempts(attempts);
        }
        if let Some(rps) = self.http.writes_per_second {
            builder = builder.write_rate_limit(RateLimiterConfig::new(rps, 1));
        }
        builder.build()
    }
}
