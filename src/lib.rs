// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Instana Provider
//!
//! Declarative management of Instana configuration objects: alert configs,
//! application perspectives, SLOs, synthetic tests, automation, RBAC groups,
//! dashboards and more.
//!
//! ## Features
//!
//! - **REST Transport**: `apiToken` authentication, retry with backoff, write throttling
//! - **Generic Resources**: one REST abstraction parameterized by path and verb policy
//! - **Tag Filters**: a small expression language mapped to the API tree and back
//! - **State Mapping**: typed state documents with validation and normalization
//! - **Provider Surface**: JSON dispatch by type name, CLI and HTTP server mode
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use instana_provider::{Context, Provider, ProviderConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> instana_provider::Result<()> {
//!     let provider = Provider::configure(ProviderConfig::new("token", "tenant.instana.io"))?;
//!
//!     let state = provider
//!         .create(
//!             &Context::new(),
//!             "instana_api_token",
//!             json!({ "name": "ci", "can_view_logs": true }),
//!         )
//!         .await?;
//!     println!("{state}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              Provider (registry, JSON dispatch, CLI)            │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───────────┬─────────────────────┐
//! │  Resources   │        Mapping            │    Data Sources     │
//! │  (driver)    │  one-of, thresholds,      │                     │
//! │              │  tag filters, channels    │                     │
//! ├──────────────┴───────────────────────────┴─────────────────────┤
//! │          REST resources (verb policy, codecs, identity)        │
//! ├────────────────────────────────────────────────────────────────┤
//! │            HTTP transport (auth, retry, rate limit)            │
//! └────────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and classification
pub mod error;

/// Common types and type aliases
pub mod types;

/// Provider configuration
pub mod config;

/// HTTP client with retry and rate limiting
pub mod http;

/// JSON codecs for API payloads
pub mod codec;

/// API entities and generic REST resources
pub mod restapi;

/// Tag filter expression language
pub mod tagfilter;

/// Shared state <-> API mapping helpers
pub mod mapping;

/// Managed resource types
pub mod resources;

/// Read-only data sources
pub mod datasources;

/// Resource registry and dispatch
pub mod provider;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

pub use config::ProviderConfig;
pub use provider::{Operation, OperationRequest, Provider};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
