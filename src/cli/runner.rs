//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, PlanArgs, StateArgs};
use crate::cli::server::{serve, ServerConfig};
use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::provider::{Operation, OperationRequest, Provider};
use crate::tagfilter;
use crate::types::{Context, JsonValue};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let ctx = Context::new();
        match &self.cli.command {
            Commands::Resources => self.list_resources(),
            Commands::Create {
                resource_type,
                plan,
            } => {
                let request = OperationRequest {
                    plan: Some(load_plan(plan)?),
                    ..Default::default()
                };
                self.apply(&ctx, resource_type, Operation::Create, request)
                    .await
            }
            Commands::Read {
                resource_type,
                state,
            } => {
                let request = OperationRequest {
                    state: Some(load_state(state)?),
                    ..Default::default()
                };
                self.apply(&ctx, resource_type, Operation::Read, request)
                    .await
            }
            Commands::Update {
                resource_type,
                plan,
                state,
            } => {
                let request = OperationRequest {
                    plan: Some(load_plan(plan)?),
                    state: Some(load_state(state)?),
                    ..Default::default()
                };
                self.apply(&ctx, resource_type, Operation::Update, request)
                    .await
            }
            Commands::Delete {
                resource_type,
                state,
            } => {
                let request = OperationRequest {
                    state: Some(load_state(state)?),
                    ..Default::default()
                };
                self.apply(&ctx, resource_type, Operation::Delete, request)
                    .await
            }
            Commands::Import { resource_type, id } => {
                let request = OperationRequest {
                    id: Some(id.clone()),
                    ..Default::default()
                };
                self.apply(&ctx, resource_type, Operation::Import, request)
                    .await
            }
            Commands::Data { name, query } => {
                let query = parse_document("query", query)?;
                let provider = self.provider()?;
                let result = provider.read_data_source(&ctx, name, query).await?;
                self.emit(&result)
            }
            Commands::NormalizeFilter { expression, wire } => {
                self.normalize_filter(expression, *wire)
            }
            Commands::Serve { port } => {
                let config = ServerConfig {
                    provider: self.provider_config()?,
                };
                serve(config, *port).await
            }
        }
    }

    /// Layer the config file, the environment and the flags
    fn provider_config(&self) -> Result<ProviderConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ProviderConfig::from_file(path)?,
            None => ProviderConfig::default(),
        }
        .merge_env();

        if let Some(endpoint) = &self.cli.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(token) = &self.cli.api_token {
            config.api_token.clone_from(token);
        }
        if self.cli.tls_skip_verify {
            config.tls_skip_verify = true;
        }
        Ok(config)
    }

    fn provider(&self) -> Result<Provider> {
        Provider::configure(self.provider_config()?)
    }

    async fn apply(
        &self,
        ctx: &Context,
        resource_type: &str,
        operation: Operation,
        request: OperationRequest,
    ) -> Result<()> {
        let provider = self.provider()?;
        debug!(resource = resource_type, operation = %operation, "Running command");
        let result = provider
            .apply(ctx, resource_type, operation, request)
            .await?;
        self.emit(&result)
    }

    /// List resource types and data sources
    fn list_resources(&self) -> Result<()> {
        let provider = self.provider()?;
        self.emit(&json!({
            "resources": provider.schemas(),
            "data_sources": provider.data_source_names(),
        }))
    }

    fn normalize_filter(&self, expression: &str, wire: bool) -> Result<()> {
        let parsed = tagfilter::parse(expression)?;
        if wire {
            self.emit(&tagfilter::to_wire(&parsed))
        } else {
            println!("{}", tagfilter::normalize(&parsed));
            Ok(())
        }
    }

    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let output = if self.cli.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{output}");
        Ok(())
    }
}

// ============================================================================
// Documents
// ============================================================================

fn load_plan(args: &PlanArgs) -> Result<JsonValue> {
    load_document("plan", args.plan.as_deref(), args.plan_file.as_deref())
}

fn load_state(args: &StateArgs) -> Result<JsonValue> {
    load_document("state", args.state.as_deref(), args.state_file.as_deref())
}

/// Inline JSON takes precedence over the file
fn load_document(field: &str, inline: Option<&str>, file: Option<&Path>) -> Result<JsonValue> {
    if let Some(json_str) = inline {
        return parse_document(field, json_str);
    }
    if let Some(path) = file {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {field} file {}: {e}", path.display()))
        })?;
        return parse_document(field, &content);
    }
    Err(Error::invalid_configuration(
        field,
        format!("--{field} or --{field}-file is required"),
    ))
}

fn parse_document(field: &str, json_str: &str) -> Result<JsonValue> {
    serde_json::from_str(json_str)
        .map_err(|e| Error::invalid_configuration(field, format!("invalid JSON: {e}")))
}
