use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::entities::{films, playlist_films, playlists, prelude::*};

pub struct PlaylistRepository {
    conn: DatabaseConnection,
}

impl PlaylistRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<playlists::Model>> {
        Ok(Playlists::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn list_for_owner(&self, user_id: i32) -> Result<Vec<playlists::Model>> {
        Ok(Playlists::find()
            .filter(playlists::Column::UserId.eq(user_id))
            .order_by_asc(playlists::Column::Name)
            .all(&self.conn)
            .await?)
    }

    /// Name uniqueness is scoped per owner; `exclude_id` lets an update
    /// skip the playlist's own current row.
    pub async fn name_exists(
        &self,
        user_id: i32,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        let mut query = Playlists::find()
            .filter(playlists::Column::UserId.eq(user_id))
            .filter(playlists::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(playlists::Column::Id.ne(id));
        }

        Ok(query.count(&self.conn).await? > 0)
    }

    pub async fn insert(
        &self,
        user_id: i32,
        name: &str,
        description: Option<String>,
    ) -> Result<playlists::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = playlists::ActiveModel {
            user_id: Set(user_id),
            name: Set(name.to_string()),
            description: Set(description),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = Playlists::insert(model).exec(&self.conn).await?;

        self.find_by_id(result.last_insert_id)
            .await?
            .context("playlist row missing after insert")
    }

    pub async fn update(
        &self,
        playlist: playlists::Model,
        name: &str,
        description: Option<String>,
    ) -> Result<playlists::Model> {
        use sea_orm::ActiveModelTrait;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: playlists::ActiveModel = playlist.into();
        active.name = Set(name.to_string());
        active.description = Set(description);
        active.updated_at = Set(now);

        Ok(active.update(&self.conn).await?)
    }

    /// Deletes the playlist and its membership rows together. Catalog
    /// entries and ratings are untouched.
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.conn.begin().await?;

        PlaylistFilms::delete_many()
            .filter(playlist_films::Column::PlaylistId.eq(id))
            .exec(&txn)
            .await?;

        Playlists::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        Ok(())
    }

    pub async fn count_films(&self, playlist_id: i32) -> Result<u64> {
        Ok(PlaylistFilms::find()
            .filter(playlist_films::Column::PlaylistId.eq(playlist_id))
            .count(&self.conn)
            .await?)
    }

    /// Up to `limit` poster URLs in membership order, for listing
    /// previews. Films without a poster are skipped.
    pub async fn poster_previews(&self, playlist_id: i32, limit: usize) -> Result<Vec<String>> {
        let films = self.films_with_added_at(playlist_id).await?;

        Ok(films
            .into_iter()
            .filter_map(|(film, _)| film.poster_url)
            .take(limit)
            .collect())
    }

    /// Films in the playlist with their membership timestamps, ordered
    /// by title.
    pub async fn films_with_added_at(
        &self,
        playlist_id: i32,
    ) -> Result<Vec<(films::Model, String)>> {
        let edges = PlaylistFilms::find()
            .filter(playlist_films::Column::PlaylistId.eq(playlist_id))
            .order_by_asc(playlist_films::Column::AddedAt)
            .order_by_asc(playlist_films::Column::Id)
            .all(&self.conn)
            .await?;

        if edges.is_empty() {
            return Ok(Vec::new());
        }

        let film_ids: Vec<i32> = edges.iter().map(|e| e.film_id).collect();
        let films: HashMap<i32, films::Model> = Films::find()
            .filter(films::Column::Id.is_in(film_ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();

        let mut rows: Vec<(films::Model, String)> = edges
            .into_iter()
            .filter_map(|edge| {
                films
                    .get(&edge.film_id)
                    .cloned()
                    .map(|film| (film, edge.added_at))
            })
            .collect();

        rows.sort_by(|(a, _), (b, _)| a.title.to_lowercase().cmp(&b.title.to_lowercase()));

        Ok(rows)
    }

    pub async fn membership_exists(&self, playlist_id: i32, film_id: i32) -> Result<bool> {
        Ok(PlaylistFilms::find()
            .filter(playlist_films::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_films::Column::FilmId.eq(film_id))
            .count(&self.conn)
            .await?
            > 0)
    }

    /// Adds a membership edge. Returns false when the edge already
    /// existed, including when this writer lost an insert race; the
    /// unique index resolves the conflict, not application locking.
    pub async fn add_membership(&self, playlist_id: i32, film_id: i32) -> Result<bool> {
        let model = playlist_films::ActiveModel {
            playlist_id: Set(playlist_id),
            film_id: Set(film_id),
            added_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let insert = PlaylistFilms::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    playlist_films::Column::PlaylistId,
                    playlist_films::Column::FilmId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match insert {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a membership edge. Returns false when no edge existed.
    pub async fn remove_membership(&self, playlist_id: i32, film_id: i32) -> Result<bool> {
        let result = PlaylistFilms::delete_many()
            .filter(playlist_films::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_films::Column::FilmId.eq(film_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
