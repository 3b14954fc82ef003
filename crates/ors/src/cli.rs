//! Command line interface
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ors serve` | Run the invalidation consumers until Ctrl-C |
//! | `ors lookup <user\|product> <id>` | One guarded lookup printed as JSON |

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use ors_domain::value_objects::RequestContext;
use ors_infrastructure::bootstrap::ServiceContainer;
use ors_infrastructure::config::{AppConfig, ConfigLoader};
use ors_infrastructure::logging::init_logging;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

/// Command line interface for the orders lookup service
#[derive(Parser, Debug)]
#[command(name = "ors")]
#[command(about = "Orders lookup service - Resilient cached lookups of users and products")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the invalidation consumers until interrupted
    Serve,
    /// Look up one entity through the cache and the resilience policies
    Lookup {
        /// Entity type
        kind: LookupKind,
        /// Entity id
        id: Uuid,
        /// Authorization header forwarded to the upstream
        #[arg(long)]
        authorization: Option<String>,
    },
}

/// Entity types accepted by `ors lookup`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Users directory
    User,
    /// Product catalog
    Product,
}

/// Load the configuration and run the selected command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    init_logging(&config.logging)?;

    match cli.command {
        Command::Serve => serve(&config).await,
        Command::Lookup {
            kind,
            id,
            authorization,
        } => {
            let ctx = authorization
                .map_or_else(RequestContext::new, RequestContext::with_authorization);
            let output = lookup(&config, kind, id, &ctx).await?;
            println!("{output}");
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let container = ServiceContainer::build(config)?;
    let consumers = container
        .spawn_invalidation_consumers(CancellationToken::new())
        .await?;

    info!("Orders lookup service running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    info!("Shutting down invalidation consumers");
    for (name, report) in consumers.shutdown().await {
        info!(
            consumer = %name,
            acked = report.acked,
            rejected = report.rejected,
            unsettled = report.unsettled,
            "Invalidation consumer finished"
        );
    }
    Ok(())
}

/// Run one lookup and render it as pretty JSON
///
/// The `status` field is `found`, `not_found` or `degraded`.
pub async fn lookup(
    config: &AppConfig,
    kind: LookupKind,
    id: Uuid,
    ctx: &RequestContext,
) -> anyhow::Result<String> {
    let container = ServiceContainer::build(config)?;
    let output = match kind {
        LookupKind::User => {
            serde_json::to_string_pretty(&container.users().fetch_by_id(id, ctx).await?)?
        }
        LookupKind::Product => {
            serde_json::to_string_pretty(&container.products().fetch_by_id(id, ctx).await?)?
        }
    };
    Ok(output)
}
