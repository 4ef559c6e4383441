//! CLI module
//!
//! Command-line interface over the provider.
//!
//! # Commands
//!
//! - `resources` - List resource types and data sources
//! - `create` / `read` / `update` / `delete` / `import` - Resource lifecycle
//! - `data` - Resolve a data source query
//! - `normalize-filter` - Canonical form of a tag filter expression
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, PlanArgs, StateArgs};
pub use runner::Runner;
pub use server::{router, serve, ServerConfig};

#[cfg(test)]
mod tests;
