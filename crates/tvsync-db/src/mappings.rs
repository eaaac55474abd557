//! Database operations for the `remote_mappings` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tvsync_core::{EntityType, MappingStore};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `remote_mappings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MappingRow {
    pub entity_type: String,
    pub local_id: i64,
    pub remote_id: String,
    pub synced_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// [`MappingStore`] backed by Postgres.
///
/// Each operation is a single statement, so concurrent engines sharing a
/// database never see a half-written entry.
#[derive(Debug, Clone)]
pub struct PgMappingStore {
    pool: PgPool,
}

impl PgMappingStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl MappingStore for PgMappingStore {
    type Error = DbError;

    async fn get(&self, entity_type: EntityType, local_id: u64) -> Result<Option<String>, DbError> {
        let remote_id = sqlx::query_scalar::<_, String>(
            "SELECT remote_id FROM remote_mappings \
             WHERE entity_type = $1 AND local_id = $2",
        )
        .bind(entity_type.as_str())
        .bind(to_bigint(local_id)?)
        .fetch_optional(&self.pool)
        .await?;

        Ok(remote_id)
    }

    async fn set(
        &self,
        entity_type: EntityType,
        local_id: u64,
        remote_id: &str,
    ) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO remote_mappings (entity_type, local_id, remote_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (entity_type, local_id) DO UPDATE \
             SET remote_id = EXCLUDED.remote_id, synced_at = NOW()",
        )
        .bind(entity_type.as_str())
        .bind(to_bigint(local_id)?)
        .bind(remote_id)
        .execute(&self.pool)
        .await?;

        tracing::debug!(%entity_type, local_id, remote_id, "mapping stored");
        Ok(())
    }

    async fn clear(&self, entity_type: EntityType, local_id: u64) -> Result<(), DbError> {
        sqlx::query("DELETE FROM remote_mappings WHERE entity_type = $1 AND local_id = $2")
            .bind(entity_type.as_str())
            .bind(to_bigint(local_id)?)
            .execute(&self.pool)
            .await?;

        tracing::debug!(%entity_type, local_id, "mapping cleared");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns stored mappings, optionally restricted to one entity type,
/// ordered by entity type then local id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_mappings(
    pool: &PgPool,
    entity_type: Option<EntityType>,
) -> Result<Vec<MappingRow>, DbError> {
    let rows = sqlx::query_as::<_, MappingRow>(
        "SELECT entity_type, local_id, remote_id, synced_at \
         FROM remote_mappings \
         WHERE $1::TEXT IS NULL OR entity_type = $1 \
         ORDER BY entity_type, local_id",
    )
    .bind(entity_type.map(EntityType::as_str))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub(crate) fn to_bigint(local_id: u64) -> Result<i64, DbError> {
    i64::try_from(local_id).map_err(|_| DbError::LocalIdOutOfRange(local_id))
}
