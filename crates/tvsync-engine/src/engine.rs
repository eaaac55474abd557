//! Event-to-action reconciliation.
//!
//! Per `(entity type, local id)` the remote state is either unsynced (no
//! mapping) or synced (mapping present). A successful create moves unsynced to
//! synced, a successful delete moves synced back to unsynced, and every
//! failure leaves the state exactly as it was. There is no retry loop: the
//! next natural event for the record is the retry.

use tvsync_client::{ApiResponse, SyncPayload, TilesViewClient, TransportError};
use tvsync_core::{CatalogEntity, EntityStatus, EntityType, MappingStore};

use crate::catalog::{Catalog, CatalogEvent};
use crate::error::SyncFailure;
use crate::locks::KeyLocks;
use crate::payload::{build_delete_payload, build_payload};

/// Why an event was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The record is not a product or category.
    Untracked { kind: String },
    Revision,
    NotPublished(EntityStatus),
    /// No mapping exists, so there is nothing remote to act on.
    NotMapped,
    /// The host could not find the record.
    NotFound,
    /// The remote API has no delete operation for this type.
    NotDeletable(EntityType),
    /// Only products go through the trash, so only they are re-synced on
    /// restore.
    NotRestorable(EntityType),
}

/// Result of handling one event.
#[derive(Debug)]
pub enum SyncOutcome {
    Created { remote_id: String },
    /// The insert succeeded but the response carried no usable id, so no
    /// mapping was stored and the next update will insert again.
    CreatedWithoutId,
    Updated { remote_id: String },
    Deleted { remote_id: String },
    Skipped(SkipReason),
    Failed(SyncFailure),
}

impl SyncOutcome {
    /// `true` for outcomes where the remote call succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SyncOutcome::Created { .. }
                | SyncOutcome::CreatedWithoutId
                | SyncOutcome::Updated { .. }
                | SyncOutcome::Deleted { .. }
        )
    }

    #[must_use]
    pub fn remote_id(&self) -> Option<&str> {
        match self {
            SyncOutcome::Created { remote_id }
            | SyncOutcome::Updated { remote_id }
            | SyncOutcome::Deleted { remote_id } => Some(remote_id),
            _ => None,
        }
    }
}

/// Reacts to host catalog events by mirroring them to TilesView.
///
/// Handlers never return errors: every failure is logged and reported as
/// [`SyncOutcome::Failed`], and the host's own action proceeds regardless.
pub struct ReconciliationEngine<C, S> {
    client: TilesViewClient,
    catalog: C,
    store: S,
    locks: KeyLocks,
}

impl<C, S> ReconciliationEngine<C, S>
where
    C: Catalog + Sync,
    S: MappingStore + Sync,
{
    pub fn new(client: TilesViewClient, catalog: C, store: S) -> Self {
        Self {
            client,
            catalog,
            store,
            locks: KeyLocks::default(),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn client(&self) -> &TilesViewClient {
        &self.client
    }

    /// Dispatches a host event to its handler, looking up the record first
    /// where the event only carries an id.
    pub async fn handle(&self, event: CatalogEvent) -> SyncOutcome {
        tracing::debug!(event = event.name(), "catalog event received");
        match event {
            CatalogEvent::ProductCreated(id) => match self.catalog.find_post(id).await {
                Some(entity) => self.on_create(&entity).await,
                None => not_found("post", id),
            },
            CatalogEvent::ProductUpdated(id) => match self.catalog.find_post(id).await {
                Some(entity) => self.on_update(&entity).await,
                None => not_found("post", id),
            },
            CatalogEvent::CategoryCreated(term_id) | CatalogEvent::CategoryUpdated(term_id) => {
                match self.catalog.find_category(term_id).await {
                    Some(category) => self.sync(&CatalogEntity::Category(category)).await,
                    None => not_found("category", term_id),
                }
            }
            CatalogEvent::PostTrashed(id) => self.on_trash(id).await,
            CatalogEvent::PostDeleted { id, entity } => self.on_permanent_delete(id, entity).await,
            CatalogEvent::PostRestored(id) => self.on_restore(id).await,
        }
    }

    pub async fn on_create(&self, entity: &CatalogEntity) -> SyncOutcome {
        tracing::info!(kind = entity.kind(), local_id = entity.id(), "create triggered");
        self.sync(entity).await
    }

    pub async fn on_update(&self, entity: &CatalogEntity) -> SyncOutcome {
        tracing::info!(kind = entity.kind(), local_id = entity.id(), "update triggered");
        self.sync(entity).await
    }

    /// Pushes the record's current state: insert when unmapped, update when
    /// mapped.
    pub async fn sync(&self, entity: &CatalogEntity) -> SyncOutcome {
        let Some(entity_type) = entity.entity_type() else {
            return skip_untracked(entity);
        };
        let _guard = self.locks.acquire(entity_type, entity.id()).await;
        self.sync_locked(entity_type, entity).await
    }

    pub async fn on_trash(&self, id: u64) -> SyncOutcome {
        tracing::info!(local_id = id, "trash triggered");
        match self.catalog.find_post(id).await {
            Some(entity) => self.delete(&entity, "trash").await,
            None => not_found("post", id),
        }
    }

    /// `entity` is the record as the host saw it just before deletion; when
    /// absent the engine looks it up.
    pub async fn on_permanent_delete(&self, id: u64, entity: Option<CatalogEntity>) -> SyncOutcome {
        tracing::info!(local_id = id, entity_passed = entity.is_some(), "permanent delete triggered");
        let entity = match entity {
            Some(entity) => Some(entity),
            None => self.catalog.find_post(id).await,
        };
        match entity {
            Some(entity) => self.delete(&entity, "permanent delete").await,
            None => not_found("post", id),
        }
    }

    /// Re-syncs a restored product if it was synced before it was trashed.
    pub async fn on_restore(&self, id: u64) -> SyncOutcome {
        tracing::info!(local_id = id, "restore triggered");
        let Some(entity) = self.catalog.find_post(id).await else {
            return not_found("post", id);
        };
        let entity_type = match entity.entity_type() {
            Some(EntityType::Product) => EntityType::Product,
            Some(other) => {
                tracing::info!(kind = entity.kind(), local_id = id, "restore not supported for type, skipping");
                return SyncOutcome::Skipped(SkipReason::NotRestorable(other));
            }
            None => return skip_untracked(&entity),
        };

        let _guard = self.locks.acquire(entity_type, id).await;
        match self.store.get(entity_type, id).await {
            Ok(Some(remote_id)) => {
                tracing::info!(local_id = id, %remote_id, "restored product was synced, re-syncing");
                self.sync_locked(entity_type, &entity).await
            }
            Ok(None) => {
                tracing::info!(local_id = id, "no TilesView id for restored product, nothing to re-sync");
                SyncOutcome::Skipped(SkipReason::NotMapped)
            }
            Err(e) => store_failure("get", entity_type, id, e),
        }
    }

    /// Hard-deletes the record's remote copy and clears its mapping.
    ///
    /// The mapping is only cleared once the remote side confirms; a failed
    /// delete keeps it so a later event can try again.
    pub async fn delete(&self, entity: &CatalogEntity, context_label: &str) -> SyncOutcome {
        let local_id = entity.id();
        let entity_type = match entity.entity_type() {
            Some(EntityType::Product) => EntityType::Product,
            Some(other) => {
                tracing::info!(kind = entity.kind(), local_id, "remote delete not supported for type, skipping");
                return SyncOutcome::Skipped(SkipReason::NotDeletable(other));
            }
            None => return skip_untracked(entity),
        };

        let _guard = self.locks.acquire(entity_type, local_id).await;
        let remote_id = match self.store.get(entity_type, local_id).await {
            Ok(Some(remote_id)) => remote_id,
            Ok(None) => {
                tracing::info!(%entity_type, local_id, context_label, "no TilesView id, skipping delete");
                return SyncOutcome::Skipped(SkipReason::NotMapped);
            }
            Err(e) => return store_failure("get", entity_type, local_id, e),
        };

        let payload = match build_delete_payload(entity_type, local_id, &remote_id) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(%entity_type, local_id, error = %e, "could not build delete payload");
                return SyncOutcome::Failed(e.into());
            }
        };

        let context = format!("{context_label} {entity_type} {local_id}");
        match self.client.delete_products(&payload, &context).await {
            Ok(_) => {
                if let Err(e) = self.store.clear(entity_type, local_id).await {
                    return store_failure("clear", entity_type, local_id, e);
                }
                tracing::info!(%entity_type, local_id, %remote_id, context_label, "deleted from TilesView");
                SyncOutcome::Deleted { remote_id }
            }
            Err(e) => transport_failure(&context, entity_type, local_id, e),
        }
    }

    async fn sync_locked(&self, entity_type: EntityType, entity: &CatalogEntity) -> SyncOutcome {
        let local_id = entity.id();

        let image_url = match entity {
            CatalogEntity::Product(product) => {
                if product.is_revision {
                    tracing::info!(local_id, "skipping revision");
                    return SyncOutcome::Skipped(SkipReason::Revision);
                }
                if product.status != EntityStatus::Published {
                    tracing::info!(local_id, status = %product.status, "skipping non-published product");
                    return SyncOutcome::Skipped(SkipReason::NotPublished(product.status));
                }
                match product.image_id {
                    Some(image_id) => self.catalog.attachment_url(image_id).await,
                    None => None,
                }
            }
            CatalogEntity::Category(_) => None,
            CatalogEntity::Untracked { .. } => return skip_untracked(entity),
        };

        let payload = match build_payload(entity, image_url.as_deref()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(%entity_type, local_id, error = %e, "could not build payload");
                return SyncOutcome::Failed(e.into());
            }
        };

        let existing = match self.store.get(entity_type, local_id).await {
            Ok(existing) => existing,
            Err(e) => return store_failure("get", entity_type, local_id, e),
        };

        match existing {
            None => self.insert(entity_type, local_id, payload).await,
            Some(remote_id) => self.update(entity_type, local_id, payload, remote_id).await,
        }
    }

    async fn insert(&self, entity_type: EntityType, local_id: u64, payload: SyncPayload) -> SyncOutcome {
        let context = format!("{entity_type} insert {local_id}");
        tracing::info!(%entity_type, local_id, "performing insert");

        let response = match self.send(&payload, true, &context).await {
            Ok(response) => response,
            Err(e) => return transport_failure(&context, entity_type, local_id, e),
        };

        let Some(remote_id) = response.remote_id() else {
            tracing::error!(
                %entity_type,
                local_id,
                body = %response.body,
                "could not extract tv_prod_id from insert response"
            );
            return SyncOutcome::CreatedWithoutId;
        };

        if let Err(e) = self.store.set(entity_type, local_id, &remote_id).await {
            // The remote record exists but is unmapped; the next event inserts again.
            tracing::error!(%entity_type, local_id, %remote_id, "remote record created but mapping not stored");
            return store_failure("set", entity_type, local_id, e);
        }

        tracing::info!(%entity_type, local_id, %remote_id, "inserted into TilesView");
        SyncOutcome::Created { remote_id }
    }

    async fn update(
        &self,
        entity_type: EntityType,
        local_id: u64,
        payload: SyncPayload,
        remote_id: String,
    ) -> SyncOutcome {
        let context = format!("{entity_type} update {local_id}");
        tracing::info!(%entity_type, local_id, %remote_id, "performing update");

        let payload = payload.with_remote_id(&remote_id);
        match self.send(&payload, false, &context).await {
            Ok(_) => {
                tracing::info!(%entity_type, local_id, %remote_id, "updated in TilesView");
                SyncOutcome::Updated { remote_id }
            }
            Err(e) => transport_failure(&context, entity_type, local_id, e),
        }
    }

    async fn send(
        &self,
        payload: &SyncPayload,
        create: bool,
        context: &str,
    ) -> Result<ApiResponse, TransportError> {
        match (payload, create) {
            (SyncPayload::Product(p), true) => self.client.create_product(p, context).await,
            (SyncPayload::Product(p), false) => self.client.update_product(p, context).await,
            (SyncPayload::Category(c), true) => self.client.create_category(c, context).await,
            (SyncPayload::Category(c), false) => self.client.update_category(c, context).await,
        }
    }
}

fn skip_untracked(entity: &CatalogEntity) -> SyncOutcome {
    tracing::info!(kind = entity.kind(), local_id = entity.id(), "skipping untracked record");
    SyncOutcome::Skipped(SkipReason::Untracked {
        kind: entity.kind().to_owned(),
    })
}

fn not_found(kind: &'static str, id: u64) -> SyncOutcome {
    tracing::warn!(kind, local_id = id, "record not found in host catalog");
    SyncOutcome::Skipped(SkipReason::NotFound)
}

fn transport_failure(
    context: &str,
    entity_type: EntityType,
    local_id: u64,
    error: TransportError,
) -> SyncOutcome {
    tracing::error!(
        context,
        %entity_type,
        local_id,
        status = error.status(),
        network = ?error.network_kind(),
        error = %error,
        "TilesView call failed, mapping unchanged"
    );
    SyncOutcome::Failed(SyncFailure::Transport(error))
}

fn store_failure<E>(
    operation: &'static str,
    entity_type: EntityType,
    local_id: u64,
    error: E,
) -> SyncOutcome
where
    E: std::error::Error + Send + Sync + 'static,
{
    tracing::error!(operation, %entity_type, local_id, error = %error, "mapping store error");
    SyncOutcome::Failed(SyncFailure::store(operation, error))
}
