//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Instana configuration provider CLI
#[derive(Parser, Debug)]
#[command(name = "instana-provider")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Tenant endpoint (host[:port], HTTPS is implied)
    #[arg(long, global = true, env = "INSTANA_ENDPOINT")]
    pub endpoint: Option<String>,

    /// API token
    #[arg(long, global = true, env = "INSTANA_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Disable server certificate verification
    #[arg(long, global = true, env = "INSTANA_TLS_SKIP_VERIFY")]
    pub tls_skip_verify: bool,

    /// Provider configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// A JSON document given inline or as a file
#[derive(clap::Args, Debug, Default, Clone)]
pub struct PlanArgs {
    /// Inline plan JSON
    #[arg(long)]
    pub plan: Option<String>,

    /// Plan JSON file
    #[arg(long)]
    pub plan_file: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct StateArgs {
    /// Inline state JSON
    #[arg(long)]
    pub state: Option<String>,

    /// State JSON file
    #[arg(long)]
    pub state_file: Option<PathBuf>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List resource types and data sources
    Resources,

    /// Create a resource from a plan
    Create {
        /// Resource type, e.g. instana_api_token
        resource_type: String,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Refresh a resource from its state
    Read {
        resource_type: String,

        #[command(flatten)]
        state: StateArgs,
    },

    /// Update a resource; the plan replaces the prior state
    Update {
        resource_type: String,

        #[command(flatten)]
        plan: PlanArgs,

        #[command(flatten)]
        state: StateArgs,
    },

    /// Delete a resource
    Delete {
        resource_type: String,

        #[command(flatten)]
        state: StateArgs,
    },

    /// Import an existing resource by id
    Import {
        resource_type: String,

        /// Resource id
        id: String,
    },

    /// Resolve a data source query
    Data {
        /// Data source name, e.g. instana_host_agents
        name: String,

        /// Inline query JSON
        #[arg(long, default_value = "{}")]
        query: String,
    },

    /// Print the canonical form of a tag filter expression
    NormalizeFilter {
        /// Tag filter expression
        expression: String,

        /// Print the API tree instead of the expression
        #[arg(long)]
        wire: bool,
    },

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

impl Commands {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Resources => "resources",
            Commands::Create { .. } => "create",
            Commands::Read { .. } => "read",
            Commands::Update { .. } => "update",
            Commands::Delete { .. } => "delete",
            Commands::Import { .. } => "import",
            Commands::Data { .. } => "data",
            Commands::NormalizeFilter { .. } => "normalize-filter",
            Commands::Serve { .. } => "serve",
        }
    }
}
