use sea_orm_migration::prelude::*;

/// Unique indexes backing the invariants that cannot be expressed as
/// single-column entity attributes: one playlist name per owner, one
/// membership edge per (playlist, film), one rating per (user, film),
/// and one cache row per key. Concurrent writers racing on these rows
/// are serialized here rather than by application locking.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_playlists_owner_name_unique ON playlists(user_id, name)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_playlist_films_unique ON playlist_films(playlist_id, film_id)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_user_ratings_unique ON user_ratings(user_id, film_id)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_metadata_cache_key_unique ON metadata_cache(cache_key)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_metadata_cache_key_unique")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_user_ratings_unique")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_playlist_films_unique")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_playlists_owner_name_unique")
            .await?;

        Ok(())
    }
}
