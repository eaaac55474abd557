//! Explicit bulk sync of many records through the batch endpoints.
//!
//! Unlike event handling this is operator-driven: records that cannot be
//! built are counted and skipped, and everything else goes out in exactly one
//! request. More than [`MAX_BATCH_SIZE`] eligible records is rejected before
//! anything is sent; splitting a catalog into batches is the caller's job.
//! Batch responses carry no per-item ids, so mappings are not touched; mapped
//! records are sent with their remote id so the service can match them.

use tvsync_client::{CategoryPayload, ProductPayload, TransportError, MAX_BATCH_SIZE};
use tvsync_core::{Category, EntityStatus, EntityType, MappingStore, Product};

use crate::catalog::Catalog;
use crate::engine::ReconciliationEngine;
use crate::error::SyncFailure;
use crate::payload::{build_category_payload, build_product_payload};

/// Totals for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Items accepted by the remote side.
    pub sent: usize,
    /// Records left out: unpublished, revisions, or unbuildable.
    pub skipped: usize,
}

impl<C, S> ReconciliationEngine<C, S>
where
    C: Catalog + Sync,
    S: MappingStore + Sync,
{
    /// Sends every syncable product in one request.
    ///
    /// # Errors
    ///
    /// Returns [`SyncFailure::Transport`] wrapping
    /// [`TransportError::BatchTooLarge`] without sending anything if more
    /// than [`MAX_BATCH_SIZE`] products are eligible, [`SyncFailure::Transport`]
    /// if the request fails, or [`SyncFailure::Store`] if a mapping lookup
    /// fails.
    pub async fn batch_sync_products(&self, products: &[Product]) -> Result<BatchReport, SyncFailure> {
        let mut report = BatchReport::default();
        let mut payloads: Vec<ProductPayload> = Vec::with_capacity(products.len());

        for product in products {
            if product.is_revision || product.status != EntityStatus::Published {
                report.skipped += 1;
                continue;
            }
            let image_url = match product.image_id {
                Some(id) => self.catalog().attachment_url(id).await,
                None => None,
            };
            let mut payload = match build_product_payload(product, image_url.as_deref()) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!(local_id = product.id, error = %e, "leaving product out of batch");
                    report.skipped += 1;
                    continue;
                }
            };
            payload.tv_prod_id = self.remote_id(EntityType::Product, product.id).await?;
            payloads.push(payload);
        }

        ensure_batch_size("product", payloads.len())?;
        if !payloads.is_empty() {
            self.client().batch_sync_products(&payloads).await?;
            report.sent = payloads.len();
        }

        tracing::info!(
            sent = report.sent,
            skipped = report.skipped,
            "product batch sync complete"
        );
        Ok(report)
    }

    /// Sends every category in one request.
    ///
    /// # Errors
    ///
    /// See [`ReconciliationEngine::batch_sync_products`].
    pub async fn batch_sync_categories(
        &self,
        categories: &[Category],
    ) -> Result<BatchReport, SyncFailure> {
        let mut report = BatchReport::default();
        let mut payloads: Vec<CategoryPayload> = Vec::with_capacity(categories.len());

        for category in categories {
            let mut payload = match build_category_payload(category) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!(local_id = category.id, error = %e, "leaving category out of batch");
                    report.skipped += 1;
                    continue;
                }
            };
            payload.tv_prod_id = self.remote_id(EntityType::Category, category.id).await?;
            payloads.push(payload);
        }

        ensure_batch_size("category", payloads.len())?;
        if !payloads.is_empty() {
            self.client().batch_sync_categories(&payloads).await?;
            report.sent = payloads.len();
        }

        tracing::info!(
            sent = report.sent,
            skipped = report.skipped,
            "category batch sync complete"
        );
        Ok(report)
    }

    async fn remote_id(&self, entity_type: EntityType, local_id: u64) -> Result<Option<String>, SyncFailure> {
        self.store()
            .get(entity_type, local_id)
            .await
            .map_err(|e| SyncFailure::store("get", e))
    }
}

fn ensure_batch_size(kind: &'static str, len: usize) -> Result<(), SyncFailure> {
    if len > MAX_BATCH_SIZE {
        tracing::error!(kind, len, max = MAX_BATCH_SIZE, "too many records for one batch, nothing sent");
        return Err(TransportError::BatchTooLarge {
            kind,
            len,
            max: MAX_BATCH_SIZE,
        }
        .into());
    }
    Ok(())
}
