//! miaasctl - read-only node dashboard for the MIaaS control-plane
//!
//! Without a subcommand it opens the interactive dashboard; `nodes` and
//! `node` do a single fetch and print the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use miaas_common::{ControlPlaneClient, DashboardConfig};
use miaasctl::errors::{exit_code_for, EXIT_GENERAL_ERROR, EXIT_SUCCESS};
use miaasctl::logging::{self, LogTarget};
use miaasctl::{dashboard, output};
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "miaasctl")]
#[command(about = "MIaaS Control Plane - node inventory dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Control-plane base URL (overrides API_BASE_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Config file (default: ~/.config/miaas/dashboard.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive node dashboard (default)
    Dashboard,

    /// Fetch the node list once and print it
    Nodes {
        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single node
    Node {
        /// Node id
        id: String,

        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard);

    let target = match command {
        Commands::Dashboard => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    logging::init(target);

    let config = DashboardConfig::resolve(cli.config.as_deref(), cli.api_url)
        .context("Failed to load dashboard configuration")?;

    match command {
        Commands::Dashboard => dashboard::run(config).await,
        Commands::Nodes { json } => std::process::exit(list_nodes(&config, json).await),
        Commands::Node { id, json } => std::process::exit(show_node(&config, &id, json).await),
    }
}

async fn list_nodes(config: &DashboardConfig, json: bool) -> i32 {
    let client = match ControlPlaneClient::new(config) {
        Ok(client) => client,
        Err(e) => return report(&e, config),
    };

    match client.list_nodes().await {
        Ok(nodes) => {
            let nodes = miaas_common::node::dedupe_by_id(nodes);
            if json {
                if let Err(e) = output::print_json(&nodes) {
                    error!("Failed to encode nodes: {}", e);
                    return EXIT_GENERAL_ERROR;
                }
            } else {
                output::print_node_list(&nodes);
            }
            EXIT_SUCCESS
        }
        Err(e) => report(&e, config),
    }
}

async fn show_node(config: &DashboardConfig, id: &str, json: bool) -> i32 {
    let client = match ControlPlaneClient::new(config) {
        Ok(client) => client,
        Err(e) => return report(&e, config),
    };

    match client.get_node(id).await {
        Ok(node) => {
            if json {
                if let Err(e) = output::print_json(&node) {
                    error!("Failed to encode node: {}", e);
                    return EXIT_GENERAL_ERROR;
                }
            } else {
                output::print_node(&node);
            }
            EXIT_SUCCESS
        }
        Err(e) => report(&e, config),
    }
}

fn report(err: &miaas_common::FetchError, config: &DashboardConfig) -> i32 {
    debug!(?err, "request failed");
    eprintln!("Error: {}", err);
    eprintln!("{}", dashboard::render::error_hint(config.base_url()));
    exit_code_for(err)
}
