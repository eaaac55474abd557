//! Per-key serialization of event handling.
//!
//! Two events for the same `(entity type, local id)` must not interleave their
//! read-mapping / call / write-mapping sequence, or a concurrent create pair
//! would both see "no mapping" and insert twice. Distinct keys never block
//! each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tvsync_core::EntityType;

type Key = (EntityType, u64);

#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    inner: Mutex<HashMap<Key, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    pub(crate) async fn acquire(&self, entity_type: EntityType, local_id: u64) -> KeyGuard<'_> {
        let key = (entity_type, local_id);
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(key).or_default())
        };
        let guard = lock.lock_owned().await;
        KeyGuard {
            locks: self,
            key,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Held for the duration of one event's handling.
pub(crate) struct KeyGuard<'a> {
    locks: &'a KeyLocks,
    key: Key,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut map = self
            .locks
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Only the map's own handle left: nobody holds or waits on this key.
        let idle = map
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            map.remove(&self.key);
        }
    }
}
