use clap::Subcommand;
use tvsync_core::{AppConfig, EntityType};

#[derive(Debug, Subcommand)]
pub enum MappingsCommands {
    /// List stored local-to-remote id mappings
    List {
        /// Only show one entity type (product or category)
        #[arg(long = "type")]
        entity_type: Option<EntityType>,
    },
}

pub(crate) async fn run_mappings(config: &AppConfig, command: MappingsCommands) -> anyhow::Result<()> {
    let pool = tvsync_db::connect_pool_from_config(config).await?;
    match command {
        MappingsCommands::List { entity_type } => {
            let rows = tvsync_db::list_mappings(&pool, entity_type).await?;
            if rows.is_empty() {
                println!("no mappings stored");
                return Ok(());
            }
            for row in rows {
                println!(
                    "{:<9} {:>10} -> {:<12} {}",
                    row.entity_type,
                    row.local_id,
                    row.remote_id,
                    row.synced_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
    }
    Ok(())
}
