use crate::db::{Store, is_unique_violation};
use crate::entities::{films, playlists};
use crate::policy;
use crate::services::ServiceError;
use crate::services::metadata::MetadataService;

const NAME_MAX_LEN: usize = 255;
const DESCRIPTION_MAX_LEN: usize = 1000;
const PREVIEW_POSTER_COUNT: usize = 4;

const PLAYLIST_NOT_FOUND: &str = "Playlist not found.";
const PLAYLIST_FORBIDDEN: &str = "This playlist belongs to another user.";
const DUPLICATE_NAME: &str = "You already have a playlist with this name.";

/// A playlist with the aggregates the listing screen needs.
pub struct PlaylistSummary {
    pub playlist: playlists::Model,
    pub film_count: u64,
    pub poster_previews: Vec<String>,
}

/// One film row inside a playlist detail view.
pub struct PlaylistEntry {
    pub film: films::Model,
    pub added_at: String,
    pub my_rating: Option<i32>,
}

pub struct PlaylistDetail {
    pub playlist: playlists::Model,
    pub films: Vec<PlaylistEntry>,
}

/// Client-supplied fields for adding a film. The fallback fields are
/// only used when the provider cannot resolve `imdb_id`.
#[derive(Debug, Default)]
pub struct AddFilmInput {
    pub imdb_id: String,
    pub title: Option<String>,
    pub year: Option<String>,
    pub media_type: Option<String>,
    pub poster_url: Option<String>,
}

/// Playlist CRUD and membership management. All mutations check
/// ownership before touching storage.
#[derive(Clone)]
pub struct PlaylistService {
    store: Store,
    metadata: MetadataService,
}

impl PlaylistService {
    #[must_use]
    pub const fn new(store: Store, metadata: MetadataService) -> Self {
        Self { store, metadata }
    }

    pub async fn create(
        &self,
        user_id: i32,
        name: &str,
        description: Option<String>,
    ) -> Result<playlists::Model, ServiceError> {
        let name = validate_name(name)?;
        let description = validate_description(description)?;

        if self.store.playlist_name_exists(user_id, &name, None).await? {
            return Err(ServiceError::conflict(DUPLICATE_NAME));
        }

        match self.store.insert_playlist(user_id, &name, description).await {
            Ok(playlist) => Ok(playlist),
            // Two creates can pass the pre-check together; the unique
            // index turns the loser into a conflict.
            Err(e) if is_unique_violation(&e) => Err(ServiceError::conflict(DUPLICATE_NAME)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update(
        &self,
        user_id: i32,
        playlist_id: i32,
        name: &str,
        description: Option<String>,
    ) -> Result<playlists::Model, ServiceError> {
        let playlist = self.owned_playlist(user_id, playlist_id).await?;

        let name = validate_name(name)?;
        let description = validate_description(description)?;

        if self
            .store
            .playlist_name_exists(user_id, &name, Some(playlist.id))
            .await?
        {
            return Err(ServiceError::conflict(DUPLICATE_NAME));
        }

        match self.store.update_playlist(playlist, &name, description).await {
            Ok(playlist) => Ok(playlist),
            Err(e) if is_unique_violation(&e) => Err(ServiceError::conflict(DUPLICATE_NAME)),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the playlist and its membership rows. Catalog entries
    /// and ratings survive.
    pub async fn delete(&self, user_id: i32, playlist_id: i32) -> Result<(), ServiceError> {
        let playlist = self.fetch(playlist_id).await?;
        if !policy::can_delete(user_id, &playlist) {
            return Err(ServiceError::forbidden(PLAYLIST_FORBIDDEN));
        }

        self.store.delete_playlist(playlist.id).await?;
        Ok(())
    }

    pub async fn list_for_owner(&self, user_id: i32) -> Result<Vec<PlaylistSummary>, ServiceError> {
        let playlists = self.store.list_playlists_for_owner(user_id).await?;

        let mut summaries = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            let film_count = self.store.count_playlist_films(playlist.id).await?;
            let poster_previews = self
                .store
                .playlist_poster_previews(playlist.id, PREVIEW_POSTER_COUNT)
                .await?;
            summaries.push(PlaylistSummary {
                playlist,
                film_count,
                poster_previews,
            });
        }

        Ok(summaries)
    }

    /// The playlist with its films ordered by title, each annotated
    /// with the caller's own rating.
    pub async fn get_detail(
        &self,
        user_id: i32,
        playlist_id: i32,
    ) -> Result<PlaylistDetail, ServiceError> {
        let playlist = self.fetch(playlist_id).await?;
        if !policy::can_view(user_id, &playlist) {
            return Err(ServiceError::forbidden(PLAYLIST_FORBIDDEN));
        }

        let rows = self.store.playlist_films_with_added_at(playlist.id).await?;
        let film_ids: Vec<i32> = rows.iter().map(|(film, _)| film.id).collect();
        let ratings = self.store.ratings_for_films(user_id, &film_ids).await?;

        let films = rows
            .into_iter()
            .map(|(film, added_at)| {
                let my_rating = ratings.get(&film.id).copied();
                PlaylistEntry {
                    film,
                    added_at,
                    my_rating,
                }
            })
            .collect();

        Ok(PlaylistDetail { playlist, films })
    }

    /// Resolves a film to a catalog row and adds it to the playlist.
    /// Resolution order: existing catalog row, then a provider detail
    /// fetch, then a minimal row built from the client's fallback
    /// fields. Returns the film and whether a new membership edge was
    /// created; adding a film that is already present succeeds.
    pub async fn add_film(
        &self,
        user_id: i32,
        playlist_id: i32,
        input: AddFilmInput,
    ) -> Result<(films::Model, bool), ServiceError> {
        let playlist = self.owned_playlist(user_id, playlist_id).await?;

        let imdb_id = input.imdb_id.trim();
        if imdb_id.is_empty() {
            return Err(ServiceError::validation("An IMDb id is required."));
        }

        let film = self.resolve_film(imdb_id, &input).await?;
        let added = self.store.add_membership(playlist.id, film.id).await?;

        Ok((film, added))
    }

    /// Removes the film from the playlist. The membership edge must
    /// exist; the catalog row and any ratings are untouched.
    pub async fn remove_film(
        &self,
        user_id: i32,
        playlist_id: i32,
        film_id: i32,
    ) -> Result<(), ServiceError> {
        let playlist = self.owned_playlist(user_id, playlist_id).await?;

        let removed = self.store.remove_membership(playlist.id, film_id).await?;
        if !removed {
            return Err(ServiceError::not_found("Film not in playlist."));
        }

        Ok(())
    }

    async fn resolve_film(
        &self,
        imdb_id: &str,
        input: &AddFilmInput,
    ) -> Result<films::Model, ServiceError> {
        if let Some(film) = self.store.find_film_by_imdb_id(imdb_id).await? {
            return Ok(film);
        }

        match self.metadata.get_detail(imdb_id).await {
            Ok(detail) => self
                .store
                .find_film_by_imdb_id(&detail.imdb_id)
                .await?
                .ok_or_else(|| ServiceError::Internal("catalog row missing after fetch".into())),
            Err(ServiceError::NotFound(_) | ServiceError::Upstream { .. }) => {
                let title = input.title.as_deref().map(str::trim).unwrap_or_default();
                if title.is_empty() {
                    return Err(ServiceError::not_found("Film not found."));
                }

                Ok(self
                    .store
                    .insert_minimal_film(
                        imdb_id,
                        title,
                        input.year.clone(),
                        input.media_type.clone(),
                        input.poster_url.clone(),
                    )
                    .await?)
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch(&self, playlist_id: i32) -> Result<playlists::Model, ServiceError> {
        self.store
            .find_playlist(playlist_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(PLAYLIST_NOT_FOUND))
    }

    async fn owned_playlist(
        &self,
        user_id: i32,
        playlist_id: i32,
    ) -> Result<playlists::Model, ServiceError> {
        let playlist = self.fetch(playlist_id).await?;
        if !policy::can_update(user_id, &playlist) {
            return Err(ServiceError::forbidden(PLAYLIST_FORBIDDEN));
        }
        Ok(playlist)
    }
}

fn validate_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation("A playlist name is required."));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ServiceError::validation(format!(
            "Playlist name must be at most {NAME_MAX_LEN} characters."
        )));
    }
    Ok(name.to_string())
}

fn validate_description(description: Option<String>) -> Result<Option<String>, ServiceError> {
    match description {
        None => Ok(None),
        Some(d) => {
            let d = d.trim();
            if d.is_empty() {
                return Ok(None);
            }
            if d.chars().count() > DESCRIPTION_MAX_LEN {
                return Err(ServiceError::validation(format!(
                    "Description must be at most {DESCRIPTION_MAX_LEN} characters."
                )));
            }
            Ok(Some(d.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_bounded() {
        assert_eq!(validate_name("  Favorites  ").unwrap(), "Favorites");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
        assert!(validate_name(&"x".repeat(255)).is_ok());
    }

    #[test]
    fn blank_description_becomes_none() {
        assert_eq!(validate_description(None).unwrap(), None);
        assert_eq!(validate_description(Some("  ".to_string())).unwrap(), None);
        assert_eq!(
            validate_description(Some(" watch soon ".to_string())).unwrap(),
            Some("watch soon".to_string())
        );
        assert!(validate_description(Some("x".repeat(1001))).is_err());
    }
}
