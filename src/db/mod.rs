use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

use crate::entities::{films, playlists};
use crate::models::film::FilmDetail;

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

/// Facade over the persisted relations. Clones share the same
/// connection pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        if in_memory {
            // More than one pooled connection would each see a distinct
            // in-memory database.
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .connect_timeout(Duration::from_secs(10))
                .acquire_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }
        opt.sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn film_repo(&self) -> repositories::film::FilmRepository {
        repositories::film::FilmRepository::new(self.conn.clone())
    }

    fn playlist_repo(&self) -> repositories::playlist::PlaylistRepository {
        repositories::playlist::PlaylistRepository::new(self.conn.clone())
    }

    fn rating_repo(&self) -> repositories::rating::RatingRepository {
        repositories::rating::RatingRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn cache_repo(&self) -> repositories::cache::CacheRepository {
        repositories::cache::CacheRepository::new(self.conn.clone())
    }

    // Catalog

    pub async fn find_film(&self, id: i32) -> Result<Option<films::Model>> {
        self.film_repo().find_by_id(id).await
    }

    pub async fn find_film_by_imdb_id(&self, imdb_id: &str) -> Result<Option<films::Model>> {
        self.film_repo().find_by_imdb_id(imdb_id).await
    }

    pub async fn upsert_film(&self, detail: &FilmDetail) -> Result<films::Model> {
        self.film_repo().upsert_detail(detail).await
    }

    pub async fn insert_minimal_film(
        &self,
        imdb_id: &str,
        title: &str,
        year: Option<String>,
        media_type: Option<String>,
        poster_url: Option<String>,
    ) -> Result<films::Model> {
        self.film_repo()
            .insert_minimal(imdb_id, title, year, media_type, poster_url)
            .await
    }

    // Playlists & membership

    pub async fn find_playlist(&self, id: i32) -> Result<Option<playlists::Model>> {
        self.playlist_repo().find_by_id(id).await
    }

    pub async fn list_playlists_for_owner(&self, user_id: i32) -> Result<Vec<playlists::Model>> {
        self.playlist_repo().list_for_owner(user_id).await
    }

    pub async fn playlist_name_exists(
        &self,
        user_id: i32,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        self.playlist_repo()
            .name_exists(user_id, name, exclude_id)
            .await
    }

    pub async fn insert_playlist(
        &self,
        user_id: i32,
        name: &str,
        description: Option<String>,
    ) -> Result<playlists::Model> {
        self.playlist_repo()
            .insert(user_id, name, description)
            .await
    }

    pub async fn update_playlist(
        &self,
        playlist: playlists::Model,
        name: &str,
        description: Option<String>,
    ) -> Result<playlists::Model> {
        self.playlist_repo()
            .update(playlist, name, description)
            .await
    }

    pub async fn delete_playlist(&self, id: i32) -> Result<()> {
        self.playlist_repo().delete(id).await
    }

    pub async fn count_playlist_films(&self, playlist_id: i32) -> Result<u64> {
        self.playlist_repo().count_films(playlist_id).await
    }

    pub async fn playlist_poster_previews(
        &self,
        playlist_id: i32,
        limit: usize,
    ) -> Result<Vec<String>> {
        self.playlist_repo()
            .poster_previews(playlist_id, limit)
            .await
    }

    pub async fn playlist_films_with_added_at(
        &self,
        playlist_id: i32,
    ) -> Result<Vec<(films::Model, String)>> {
        self.playlist_repo().films_with_added_at(playlist_id).await
    }

    pub async fn membership_exists(&self, playlist_id: i32, film_id: i32) -> Result<bool> {
        self.playlist_repo()
            .membership_exists(playlist_id, film_id)
            .await
    }

    pub async fn add_membership(&self, playlist_id: i32, film_id: i32) -> Result<bool> {
        self.playlist_repo()
            .add_membership(playlist_id, film_id)
            .await
    }

    pub async fn remove_membership(&self, playlist_id: i32, film_id: i32) -> Result<bool> {
        self.playlist_repo()
            .remove_membership(playlist_id, film_id)
            .await
    }

    // Ratings

    pub async fn get_rating(&self, user_id: i32, film_id: i32) -> Result<Option<i32>> {
        self.rating_repo().get(user_id, film_id).await
    }

    pub async fn ratings_for_films(
        &self,
        user_id: i32,
        film_ids: &[i32],
    ) -> Result<HashMap<i32, i32>> {
        self.rating_repo().for_films(user_id, film_ids).await
    }

    pub async fn upsert_rating(&self, user_id: i32, film_id: i32, rating: i32) -> Result<()> {
        self.rating_repo().upsert(user_id, film_id, rating).await
    }

    pub async fn delete_rating(&self, user_id: i32, film_id: i32) -> Result<bool> {
        self.rating_repo().delete(user_id, film_id).await
    }

    // Users

    pub async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        self.user_repo().create(username, password).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    // Metadata cache

    pub async fn cache_get(&self, key: &str) -> Result<Option<String>> {
        self.cache_repo().get(key).await
    }

    pub async fn cache_set(&self, key: &str, payload: &str, ttl: chrono::Duration) -> Result<()> {
        self.cache_repo().set(key, payload, ttl).await
    }
}

/// True when an error chain bottoms out in a SQLite unique-constraint
/// violation. Used to downgrade insert races on unique rows.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    format!("{err:#}").contains("UNIQUE constraint failed")
}
