use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod filters;
mod mappings;
mod sync;

use filters::FiltersCommands;
use mappings::MappingsCommands;
use sync::{BatchKind, SyncTarget};

#[derive(Debug, Parser)]
#[command(name = "tvsync")]
#[command(about = "Mirror a product catalog to TilesView")]
struct Cli {
    /// Catalog snapshot to replay events from (overrides TILESVIEW_CATALOG_PATH)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a create/update event for one record
    Sync {
        #[command(subcommand)]
        target: SyncTarget,
    },
    /// Replay a product being moved to the trash
    Trash { id: u64 },
    /// Replay a product being permanently deleted
    Delete { id: u64 },
    /// Replay a product being restored from the trash
    Restore { id: u64 },
    /// Push every record of one type through the batch endpoint
    Batch {
        #[command(subcommand)]
        kind: BatchKind,
    },
    /// Manage TilesView filter labels
    Filters {
        #[command(subcommand)]
        command: FiltersCommands,
    },
    /// Inspect stored remote id mappings
    Mappings {
        #[command(subcommand)]
        command: MappingsCommands,
    },
    /// Mapping database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = tvsync_core::load_app_config_from_env().context("failed to load configuration")?;
    if let Some(path) = cli.catalog {
        config.catalog_path = path;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(config.log_filter()))
                .context("invalid log filter")?,
        )
        .init();
    tracing::debug!(?config, "configuration loaded");

    let Some(command) = cli.command else {
        println!("tvsync: no command given, see --help");
        return Ok(());
    };

    match command {
        Commands::Sync { target } => sync::run_sync(&config, target).await,
        Commands::Trash { id } => sync::run_trash(&config, id).await,
        Commands::Delete { id } => sync::run_delete(&config, id).await,
        Commands::Restore { id } => sync::run_restore(&config, id).await,
        Commands::Batch { kind } => sync::run_batch(&config, kind).await,
        Commands::Filters { command } => filters::run_filters(&config, command).await,
        Commands::Mappings { command } => mappings::run_mappings(&config, command).await,
        Commands::Db { command } => run_db(&config, command).await,
    }
}

async fn run_db(config: &tvsync_core::AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = tvsync_db::connect_pool_from_config(config).await?;
    match command {
        DbCommands::Ping => {
            tvsync_db::ping(&pool).await?;
            println!("database reachable");
        }
        DbCommands::Migrate => {
            let applied = tvsync_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}
