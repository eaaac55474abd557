use thiserror::Error;
use tvsync_client::TransportError;
use tvsync_core::EntityType;

/// A payload could not be built; no request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("{entity_type} {local_id} is missing required field `{field}`")]
    MissingRequiredField {
        entity_type: EntityType,
        local_id: u64,
        field: &'static str,
    },

    #[error("remote id \"{remote_id}\" for {entity_type} {local_id} is not an integer")]
    InvalidRemoteId {
        entity_type: EntityType,
        local_id: u64,
        remote_id: String,
    },

    #[error("record {local_id} of kind \"{kind}\" is not synced")]
    Untracked { local_id: u64, kind: String },
}

/// Why a sync attempt did not take effect.
///
/// Failures are never propagated to the host: they are logged and returned
/// as [`crate::SyncOutcome::Failed`], and the mapping is left as it was.
#[derive(Debug, Error)]
pub enum SyncFailure {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("mapping store {operation} failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SyncFailure {
    pub(crate) fn store<E>(operation: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SyncFailure::Store {
            operation,
            source: Box::new(source),
        }
    }
}
