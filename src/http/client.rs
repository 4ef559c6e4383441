//! Instana REST transport
//!
//! Provides the HTTP client used by every REST resource:
//! - `apiToken` authentication on every request
//! - Write throttling through a shared token bucket
//! - Retries with capped exponential backoff for transient failures
//! - Classification of non-2xx responses into error kinds
//!
//! The transport never parses bodies; it moves bytes.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::types::{Context, StringMap};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::{debug, warn};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Configuration for the HTTP client
#[derive(Clone)]
pub struct HttpClientConfig {
    /// Scheme, host and port prepended to every resource path
    pub base_url: String,
    /// API token sent with every request
    pub api_token: String,
    /// Disable server certificate verification
    pub tls_skip_verify: bool,
    /// Request timeout
    pub timeout: Duration,
    /// Total attempts for a retryable request
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Growth factor between consecutive delays
    pub backoff_multiplier: u32,
    /// Upper bound of a single delay
    pub max_backoff: Duration,
    /// Throttle applied to POST, PUT and DELETE
    pub write_rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: String::new(),
            tls_skip_verify: false,
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            backoff_multiplier: 4,
            max_backoff: Duration::from_secs(4),
            write_rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("instana-provider/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl std::fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("base_url", &self.base_url)
            .field("tls_skip_verify", &self.tls_skip_verify)
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .field("initial_backoff", &self.initial_backoff)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("max_backoff", &self.max_backoff)
            .field("write_rate_limit", &self.write_rate_limit)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the API token
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = token.into();
        self
    }

    /// Disable certificate verification
    pub fn tls_skip_verify(mut self, skip: bool) -> Self {
        self.config.tls_skip_verify = skip;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the total number of attempts
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts.max(1);
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, initial: Duration, multiplier: u32, max: Duration) -> Self {
        self.config.initial_backoff = initial;
        self.config.backoff_multiplier = multiplier;
        self.config.max_backoff = max;
        self
    }

    /// Set the write throttle
    pub fn write_rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.write_rate_limit = Some(config);
        self
    }

    /// Disable write throttling
    pub fn no_rate_limit(mut self) -> Self {
        self.config.write_rate_limit = None;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

// ============================================================================
// Transport contract
// ============================================================================

/// Raw REST operations against the Instana API.
///
/// Every call returns the response body or a classified error. Resource
/// paths are absolute (`/api/...`); `id` arguments are appended as the last
/// path segment.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// GET `{path}`
    async fn get(&self, ctx: &Context, path: &str) -> Result<Bytes>;

    /// GET `{path}/{id}`
    async fn get_one(&self, ctx: &Context, path: &str, id: &str) -> Result<Bytes>;

    /// GET `{path}?{query}`
    async fn get_by_query(&self, ctx: &Context, path: &str, query: &StringMap) -> Result<Bytes>;

    /// POST `{path}` with a JSON body
    async fn post(&self, ctx: &Context, path: &str, body: Bytes) -> Result<Bytes>;

    /// POST `{path}/{id}` with a JSON body
    async fn post_by_id(&self, ctx: &Context, path: &str, id: &str, body: Bytes) -> Result<Bytes>;

    /// PUT `{path}` with a JSON body
    async fn put(&self, ctx: &Context, path: &str, body: Bytes) -> Result<Bytes>;

    /// PUT `{path}/{id}` with a JSON body
    async fn put_by_id(&self, ctx: &Context, path: &str, id: &str, body: Bytes) -> Result<Bytes>;

    /// DELETE `{path}/{id}`
    async fn delete(&self, ctx: &Context, path: &str, id: &str) -> Result<()>;

    /// POST `{path}?{query}` without a body
    async fn post_by_query(&self, ctx: &Context, path: &str, query: &StringMap) -> Result<Bytes>;

    /// PUT `{path}/{id}?{query}` without a body
    async fn put_by_query(
        &self,
        ctx: &Context,
        path: &str,
        id: &str,
        query: &StringMap,
    ) -> Result<Bytes>;
}

/// Join a collection path and an id
pub fn resource_path(base: &str, id: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{id}")
    } else {
        format!("{base}/{id}")
    }
}

/// A single outgoing call, rebuilt for every attempt
struct Call<'a> {
    method: Method,
    path: String,
    query: Option<&'a StringMap>,
    body: Option<Bytes>,
}

impl<'a> Call<'a> {
    fn new(method: Method, path: String) -> Self {
        Self {
            method,
            path,
            query: None,
            body: None,
        }
    }

    fn query(mut self, query: &'a StringMap) -> Self {
        self.query = Some(query);
        self
    }

    fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    fn is_write(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::DELETE)
    }

    fn is_idempotent(&self) -> bool {
        matches!(self.method, Method::GET | Method::DELETE)
    }
}

// ============================================================================
// Instana client
// ============================================================================

/// HTTP transport for the Instana API
#[derive(Clone)]
pub struct InstanaClient {
    client: Client,
    config: HttpClientConfig,
    write_limiter: Option<RateLimiter>,
}

impl InstanaClient {
    /// Create a new client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.tls_skip_verify)
            .build()?;

        let write_limiter = config.write_rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            write_limiter,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if write throttling is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.write_limiter.is_some()
    }

    /// Calculate backoff delay before retry number `attempt` (zero based)
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let factor = self.config.backoff_multiplier.saturating_pow(attempt);
        let delay = self.config.initial_backoff.saturating_mul(factor);
        std::cmp::min(delay, self.config.max_backoff)
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Execute a call with throttling, retries and cancellation
    async fn execute(&self, ctx: &Context, call: Call<'_>) -> Result<Bytes> {
        let url = self.build_url(&call.path);
        let mut attempt = 0;

        loop {
            ctx.check()?;

            if call.is_write() {
                if let Some(ref limiter) = self.write_limiter {
                    limiter.acquire(ctx).await?;
                }
            }

            debug!("Call {} {}", call.method, url);
            let result = tokio::select! {
                biased;
                () = ctx.cancelled() => return Err(Error::Cancelled),
                result = self.send(&call, &url) => result,
            };

            let err = match result {
                Ok(bytes) => return Ok(bytes),
                Err(e) => e,
            };

            attempt += 1;
            if attempt >= self.config.max_attempts || !should_retry(&err, call.is_idempotent()) {
                return Err(err);
            }

            let delay = self.calculate_backoff(attempt - 1);
            warn!(
                "{} {} failed ({}), attempt {}/{}, retrying in {:?}",
                call.method, call.path, err, attempt, self.config.max_attempts, delay
            );
            tokio::select! {
                biased;
                () = ctx.cancelled() => return Err(Error::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Send one request and classify the outcome
    async fn send(&self, call: &Call<'_>, url: &str) -> Result<Bytes> {
        let mut req = self
            .client
            .request(call.method.clone(), url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("apiToken {}", self.config.api_token));

        if let Some(query) = call.query {
            req = req.query(query);
        }

        if let Some(ref body) = call.body {
            req = req.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(body.clone());
        }

        let response = req.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();

        if status.is_success() {
            debug!("Response {} for {} {}", status.as_u16(), call.method, call.path);
            return response.bytes().await.map_err(|e| self.map_send_error(e));
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::from_status(status.as_u16(), &call.path, body))
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(e)
        }
    }
}

impl std::fmt::Debug for InstanaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanaClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.write_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// GET and DELETE retry every transient failure. POST and PUT retry only
/// when the connection could not be established, so no byte reached the server.
fn should_retry(err: &Error, idempotent: bool) -> bool {
    if idempotent {
        return err.is_retryable();
    }
    matches!(err, Error::Http(e) if e.is_connect())
}

#[async_trait]
impl RestClient for InstanaClient {
    async fn get(&self, ctx: &Context, path: &str) -> Result<Bytes> {
        self.execute(ctx, Call::new(Method::GET, path.to_string()))
            .await
    }

    async fn get_one(&self, ctx: &Context, path: &str, id: &str) -> Result<Bytes> {
        self.execute(ctx, Call::new(Method::GET, resource_path(path, id)))
            .await
    }

    async fn get_by_query(&self, ctx: &Context, path: &str, query: &StringMap) -> Result<Bytes> {
        self.execute(ctx, Call::new(Method::GET, path.to_string()).query(query))
            .await
    }

    async fn post(&self, ctx: &Context, path: &str, body: Bytes) -> Result<Bytes> {
        self.execute(ctx, Call::new(Method::POST, path.to_string()).body(body))
            .await
    }

    async fn post_by_id(&self, ctx: &Context, path: &str, id: &str, body: Bytes) -> Result<Bytes> {
        self.execute(ctx, Call::new(Method::POST, resource_path(path, id)).body(body))
            .await
    }

    async fn put(&self, ctx: &Context, path: &str, body: Bytes) -> Result<Bytes> {
        self.execute(ctx, Call::new(Method::PUT, path.to_string()).body(body))
            .await
    }

    async fn put_by_id(&self, ctx: &Context, path: &str, id: &str, body: Bytes) -> Result<Bytes> {
        self.execute(ctx, Call::new(Method::PUT, resource_path(path, id)).body(body))
            .await
    }

    async fn delete(&self, ctx: &Context, path: &str, id: &str) -> Result<()> {
        self.execute(ctx, Call::new(Method::DELETE, resource_path(path, id)))
            .await
            .map(|_| ())
    }

    async fn post_by_query(&self, ctx: &Context, path: &str, query: &StringMap) -> Result<Bytes> {
        self.execute(ctx, Call::new(Method::POST, path.to_string()).query(query))
            .await
    }

    async fn put_by_query(
        &self,
        ctx: &Context,
        path: &str,
        id: &str,
        query: &StringMap,
    ) -> Result<Bytes> {
        self.execute(ctx, Call::new(Method::PUT, resource_path(path, id)).query(query))
            .await
    }
}
