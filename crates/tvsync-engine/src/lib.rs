//! Catalog event reconciliation for TilesView.
//!
//! [`ReconciliationEngine`] turns host catalog events into create, update,
//! and delete calls against the TilesView API and keeps the local-to-remote
//! id mapping in step with what the remote side has accepted.

pub mod batch;
pub mod catalog;
pub mod engine;
pub mod error;
mod locks;
pub mod payload;

pub use batch::BatchReport;
pub use catalog::{Catalog, CatalogEvent, MemoryCatalog};
pub use engine::{ReconciliationEngine, SkipReason, SyncOutcome};
pub use error::{BuildError, SyncFailure};
pub use payload::{build_category_payload, build_delete_payload, build_payload, build_product_payload};
