//! Event replay and batch commands.
//!
//! Each invocation loads the catalog snapshot into memory, wires it to the
//! Postgres mapping store, and feeds one event through the engine, exactly as
//! a host hook would.

use anyhow::Context;
use clap::Subcommand;
use tvsync_client::TilesViewClient;
use tvsync_core::AppConfig;
use tvsync_db::PgMappingStore;
use tvsync_engine::{CatalogEvent, MemoryCatalog, ReconciliationEngine, SyncOutcome};

type Engine = ReconciliationEngine<MemoryCatalog, PgMappingStore>;

#[derive(Debug, Subcommand)]
pub enum SyncTarget {
    /// Sync a product by post id
    Product { id: u64 },
    /// Sync a category by term id
    Category { id: u64 },
}

#[derive(Debug, Subcommand)]
pub enum BatchKind {
    Products,
    Categories,
}

pub(crate) async fn build_engine(config: &AppConfig) -> anyhow::Result<Engine> {
    let snapshot = tvsync_core::load_catalog_snapshot(&config.catalog_path)
        .with_context(|| format!("failed to load catalog {}", config.catalog_path.display()))?;
    let catalog = MemoryCatalog::from_snapshot(snapshot);

    let pool = tvsync_db::connect_pool_from_config(config).await?;
    let applied = tvsync_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "mapping store migrations applied");
    }

    let client = TilesViewClient::from_config(config)?;
    Ok(ReconciliationEngine::new(client, catalog, PgMappingStore::new(pool)))
}

pub(crate) async fn run_sync(config: &AppConfig, target: SyncTarget) -> anyhow::Result<()> {
    let engine = build_engine(config).await?;
    let event = match target {
        SyncTarget::Product { id } => CatalogEvent::ProductUpdated(id),
        SyncTarget::Category { id } => CatalogEvent::CategoryUpdated(id),
    };
    report(engine.handle(event).await)
}

pub(crate) async fn run_trash(config: &AppConfig, id: u64) -> anyhow::Result<()> {
    let engine = build_engine(config).await?;
    report(engine.handle(CatalogEvent::PostTrashed(id)).await)
}

pub(crate) async fn run_delete(config: &AppConfig, id: u64) -> anyhow::Result<()> {
    let engine = build_engine(config).await?;
    // The host removes the record right after the hook fires; hand it over
    // the same way.
    let entity = engine.catalog().remove_post(id);
    report(
        engine
            .handle(CatalogEvent::PostDeleted { id, entity })
            .await,
    )
}

pub(crate) async fn run_restore(config: &AppConfig, id: u64) -> anyhow::Result<()> {
    let engine = build_engine(config).await?;
    report(engine.handle(CatalogEvent::PostRestored(id)).await)
}

pub(crate) async fn run_batch(config: &AppConfig, kind: BatchKind) -> anyhow::Result<()> {
    let engine = build_engine(config).await?;
    let report = match kind {
        BatchKind::Products => {
            let products = engine.catalog().products();
            engine.batch_sync_products(&products).await?
        }
        BatchKind::Categories => {
            let categories = engine.catalog().categories();
            engine.batch_sync_categories(&categories).await?
        }
    };
    println!("sent {} item(s), skipped {}", report.sent, report.skipped);
    Ok(())
}

fn report(outcome: SyncOutcome) -> anyhow::Result<()> {
    match outcome {
        SyncOutcome::Created { remote_id } => println!("created, TilesView id {remote_id}"),
        SyncOutcome::CreatedWithoutId => {
            println!("created, but the response carried no TilesView id; record left unmapped");
        }
        SyncOutcome::Updated { remote_id } => println!("updated TilesView id {remote_id}"),
        SyncOutcome::Deleted { remote_id } => println!("deleted TilesView id {remote_id}"),
        SyncOutcome::Skipped(reason) => println!("skipped: {reason:?}"),
        SyncOutcome::Failed(failure) => {
            return Err(anyhow::Error::new(failure).context("sync failed"));
        }
    }
    Ok(())
}
