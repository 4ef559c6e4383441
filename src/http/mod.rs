//! HTTP transport module
//!
//! Provides the authenticated Instana REST client with retry, write
//! throttling and error classification.
//!
//! # Features
//!
//! - **Retries**: transient failures of GET and DELETE are retried with
//!   capped exponential backoff (250 ms, 1 s, 4 s; 3 attempts)
//! - **Write throttling**: token bucket rate limiter using governor
//! - **Cancellation**: every call observes the operation [`Context`](crate::types::Context)

mod client;
mod rate_limit;

pub use client::{
    resource_path, HttpClientConfig, HttpClientConfigBuilder, InstanaClient, RestClient,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
