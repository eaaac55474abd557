//! Local-id to remote-id association, one entry per `(entity type, local id)`.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::sync::{PoisonError, RwLock};

use crate::catalog::EntityType;

/// Persistent store for remote ids.
///
/// Entries are independent of each other; implementations need no
/// cross-key transactions. An absent entry means the entity has never been
/// synced, or its remote copy has been deleted.
pub trait MappingStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(
        &self,
        entity_type: EntityType,
        local_id: u64,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    fn set(
        &self,
        entity_type: EntityType,
        local_id: u64,
        remote_id: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn clear(
        &self,
        entity_type: EntityType,
        local_id: u64,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Process-local mapping store.
#[derive(Debug, Default)]
pub struct MemoryMappingStore {
    entries: RwLock<HashMap<(EntityType, u64), String>>,
}

impl MemoryMappingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MappingStore for MemoryMappingStore {
    type Error = Infallible;

    async fn get(&self, entity_type: EntityType, local_id: u64) -> Result<Option<String>, Infallible> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(&(entity_type, local_id)).cloned())
    }

    async fn set(
        &self,
        entity_type: EntityType,
        local_id: u64,
        remote_id: &str,
    ) -> Result<(), Infallible> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert((entity_type, local_id), remote_id.to_owned());
        Ok(())
    }

    async fn clear(&self, entity_type: EntityType, local_id: u64) -> Result<(), Infallible> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&(entity_type, local_id));
        Ok(())
    }
}
