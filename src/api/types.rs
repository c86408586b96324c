use serde::Serialize;

use crate::entities::films;
use crate::models::film::SourceRating;
use crate::services::playlist::{PlaylistDetail, PlaylistSummary};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilmDto {
    pub id: i32,
    pub imdb_id: String,
    pub title: String,
    pub year: Option<String>,
    pub media_type: Option<String>,
    pub poster_url: Option<String>,
    pub plot_short: Option<String>,
    pub plot_full: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub runtime: Option<String>,
    pub imdb_rating: Option<String>,
    pub metascore: Option<String>,
    pub other_ratings: Vec<SourceRating>,
    pub details_fetched_at: Option<String>,
}

impl From<films::Model> for FilmDto {
    fn from(model: films::Model) -> Self {
        // A row written before the ratings column format settled just
        // loses its outlet ratings.
        let other_ratings = model
            .other_ratings
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();

        Self {
            id: model.id,
            imdb_id: model.imdb_id,
            title: model.title,
            year: model.year,
            media_type: model.media_type,
            poster_url: model.poster_url,
            plot_short: model.plot_short,
            plot_full: model.plot_full,
            genre: model.genre,
            director: model.director,
            actors: model.actors,
            runtime: model.runtime,
            imdb_rating: model.imdb_rating,
            metascore: model.metascore,
            other_ratings,
            details_fetched_at: model.details_fetched_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaylistDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub film_count: u64,
    pub poster_previews: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PlaylistSummary> for PlaylistDto {
    fn from(summary: PlaylistSummary) -> Self {
        Self {
            id: summary.playlist.id,
            name: summary.playlist.name,
            description: summary.playlist.description,
            film_count: summary.film_count,
            poster_previews: summary.poster_previews,
            created_at: summary.playlist.created_at,
            updated_at: summary.playlist.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaylistFilmDto {
    #[serde(flatten)]
    pub film: FilmDto,
    pub added_at: String,
    pub my_rating: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistDetailDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub films: Vec<PlaylistFilmDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PlaylistDetail> for PlaylistDetailDto {
    fn from(detail: PlaylistDetail) -> Self {
        Self {
            id: detail.playlist.id,
            name: detail.playlist.name,
            description: detail.playlist.description,
            films: detail
                .films
                .into_iter()
                .map(|entry| PlaylistFilmDto {
                    film: entry.film.into(),
                    added_at: entry.added_at,
                    my_rating: entry.my_rating,
                })
                .collect(),
            created_at: detail.playlist.created_at,
            updated_at: detail.playlist.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddFilmResponse {
    pub message: String,
    pub film: FilmDto,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub message: String,
    pub rating: Option<i32>,
}
