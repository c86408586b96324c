use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::{metadata_cache, prelude::*};

/// String key/value cache with per-entry TTL, persisted alongside the
/// catalog. There is no invalidation beyond expiry; stale reads inside
/// the TTL window are accepted.
pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns the unexpired payload for `key`, if any.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = chrono::Utc::now().to_rfc3339();

        // Opportunistic cleanup of expired entries.
        let _ = MetadataCache::delete_many()
            .filter(metadata_cache::Column::ExpiresAt.lt(&now))
            .exec(&self.conn)
            .await;

        let entry = MetadataCache::find()
            .filter(metadata_cache::Column::CacheKey.eq(key))
            .filter(metadata_cache::Column::ExpiresAt.gt(&now))
            .one(&self.conn)
            .await?;

        Ok(entry.map(|e| e.payload))
    }

    /// Stores `payload` under `key` for `ttl`, replacing any previous
    /// entry atomically.
    pub async fn set(&self, key: &str, payload: &str, ttl: chrono::Duration) -> Result<()> {
        let now = chrono::Utc::now();

        let model = metadata_cache::ActiveModel {
            cache_key: Set(key.to_string()),
            payload: Set(payload.to_string()),
            created_at: Set(now.to_rfc3339()),
            expires_at: Set((now + ttl).to_rfc3339()),
            ..Default::default()
        };

        MetadataCache::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(metadata_cache::Column::CacheKey)
                    .update_columns([
                        metadata_cache::Column::Payload,
                        metadata_cache::Column::CreatedAt,
                        metadata_cache::Column::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }
}
