use std::sync::Arc;

use tracing::warn;

use crate::clients::omdb::OmdbDetail;
use crate::clients::{MetadataProvider, SearchFilters};
use crate::db::Store;
use crate::models::film::{DetailOutcome, FilmDetail, SearchHit, SearchOutcome, SourceRating};
use crate::services::ServiceError;

/// Longest plot excerpt stored alongside the full text.
const PLOT_SHORT_LIMIT: usize = 250;

const SEARCH_FAILURE_MESSAGE: &str = "Failed to fetch data from OMDb API.";
const DETAIL_FAILURE_MESSAGE: &str = "Film not found or API error.";

/// Read-through gateway to the external film-data provider. Every
/// lookup consults the persisted cache first; outcomes (including
/// provider "not found" replies) are cached so repeated queries do not
/// hammer the provider.
#[derive(Clone)]
pub struct MetadataService {
    store: Store,
    provider: Arc<dyn MetadataProvider>,
    search_ttl: chrono::Duration,
    detail_ttl: chrono::Duration,
}

impl MetadataService {
    #[must_use]
    pub fn new(
        store: Store,
        provider: Arc<dyn MetadataProvider>,
        search_ttl_minutes: i64,
        detail_ttl_hours: i64,
    ) -> Self {
        Self {
            store,
            provider,
            search_ttl: chrono::Duration::minutes(search_ttl_minutes),
            detail_ttl: chrono::Duration::hours(detail_ttl_hours),
        }
    }

    /// Title search against the provider, cached per normalized query
    /// and filter combination. Provider failures come back as an
    /// `ok == false` outcome rather than an error so the response shape
    /// stays uniform.
    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchOutcome, ServiceError> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Err(ServiceError::validation(
                "Search query must be at least 2 characters.",
            ));
        }

        let key = search_cache_key(query, filters);

        if let Some(payload) = self.store.cache_get(&key).await? {
            match serde_json::from_str::<SearchOutcome>(&payload) {
                Ok(outcome) => return Ok(outcome),
                Err(e) => warn!(error = %e, key, "Discarding unreadable cached search outcome"),
            }
        }

        let outcome = match self.provider.search(query, filters).await {
            Ok(page) if page.is_found() => {
                let results: Vec<SearchHit> = page
                    .search
                    .into_iter()
                    .map(|item| SearchHit {
                        imdb_id: item.imdb_id,
                        title: item.title,
                        year: na(item.year),
                        media_type: na(item.media_type),
                        poster_url: na(item.poster),
                    })
                    .collect();
                let total_count = page
                    .total_results
                    .as_deref()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(results.len() as u32);

                SearchOutcome {
                    ok: true,
                    results,
                    total_count,
                    error: None,
                }
            }
            Ok(page) => SearchOutcome::failed(
                page.error
                    .unwrap_or_else(|| SEARCH_FAILURE_MESSAGE.to_string()),
            ),
            Err(e) => {
                warn!(error = %e, query, "OMDb search request failed");
                SearchOutcome::failed(SEARCH_FAILURE_MESSAGE.to_string())
            }
        };

        self.store
            .cache_set(&key, &serde_json::to_string(&outcome)?, self.search_ttl)
            .await?;

        Ok(outcome)
    }

    /// Detail lookup by external id. A fresh hit refreshes the catalog
    /// row before being cached; a provider "not found" is cached too and
    /// surfaces as [`ServiceError::NotFound`]. Transport failures are
    /// not cached so a transient outage doesn't poison the key.
    pub async fn get_detail(&self, imdb_id: &str) -> Result<FilmDetail, ServiceError> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            return Err(ServiceError::validation("An IMDb id is required."));
        }

        let key = format!("detail:{imdb_id}");

        if let Some(payload) = self.store.cache_get(&key).await? {
            match serde_json::from_str::<DetailOutcome>(&payload) {
                Ok(outcome) => {
                    return outcome.film.ok_or_else(|| {
                        ServiceError::not_found(
                            outcome
                                .error
                                .unwrap_or_else(|| DETAIL_FAILURE_MESSAGE.to_string()),
                        )
                    });
                }
                Err(e) => warn!(error = %e, key, "Discarding unreadable cached detail outcome"),
            }
        }

        let payload = self
            .provider
            .detail(imdb_id)
            .await
            .map_err(|e| ServiceError::omdb_error(format!("{e:#}")))?;

        if payload.is_found() {
            let detail = normalize_detail(&payload)
                .ok_or_else(|| ServiceError::omdb_error("Malformed detail payload"))?;

            self.store.upsert_film(&detail).await?;

            let outcome = DetailOutcome {
                film: Some(detail.clone()),
                error: None,
            };
            self.store
                .cache_set(&key, &serde_json::to_string(&outcome)?, self.detail_ttl)
                .await?;

            Ok(detail)
        } else {
            let message = payload
                .error
                .unwrap_or_else(|| DETAIL_FAILURE_MESSAGE.to_string());

            let outcome = DetailOutcome {
                film: None,
                error: Some(message.clone()),
            };
            self.store
                .cache_set(&key, &serde_json::to_string(&outcome)?, self.detail_ttl)
                .await?;

            Err(ServiceError::not_found(message))
        }
    }
}

fn search_cache_key(query: &str, filters: &SearchFilters) -> String {
    format!(
        "search:q={}&type={}&y={}&page={}",
        query,
        filters.media_type.map(|t| t.as_str()).unwrap_or(""),
        filters.year.as_deref().unwrap_or(""),
        filters.page.map_or(String::new(), |p| p.to_string()),
    )
}

/// Maps the provider's "N/A" sentinel (and blank strings) to None.
fn na(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let v = v.trim();
        if v.is_empty() || v == "N/A" {
            None
        } else {
            Some(v.to_string())
        }
    })
}

/// First 250 characters of the plot, with an ellipsis when truncated.
fn short_plot(full: &str) -> String {
    if full.chars().count() > PLOT_SHORT_LIMIT {
        let mut short: String = full.chars().take(PLOT_SHORT_LIMIT).collect();
        short.push_str("...");
        short
    } else {
        full.to_string()
    }
}

/// Builds a normalized [`FilmDetail`] from a found provider payload.
/// Returns None when the payload is missing its id or title.
fn normalize_detail(payload: &OmdbDetail) -> Option<FilmDetail> {
    let imdb_id = na(payload.imdb_id.clone())?;
    let title = na(payload.title.clone())?;

    let plot_full = na(payload.plot.clone());
    let plot_short = plot_full.as_deref().map(short_plot);

    Some(FilmDetail {
        imdb_id,
        title,
        year: na(payload.year.clone()),
        media_type: na(payload.media_type.clone()),
        poster_url: na(payload.poster.clone()),
        plot_short,
        plot_full,
        genre: na(payload.genre.clone()),
        director: na(payload.director.clone()),
        actors: na(payload.actors.clone()),
        runtime: na(payload.runtime.clone()),
        imdb_rating: na(payload.imdb_rating.clone()),
        metascore: na(payload.metascore.clone()),
        other_ratings: payload
            .ratings
            .iter()
            .map(|r| SourceRating {
                source: r.source.clone(),
                value: r.value.clone(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::film::MediaType;

    #[test]
    fn na_maps_sentinel_and_blank_to_none() {
        assert_eq!(na(Some("N/A".to_string())), None);
        assert_eq!(na(Some("  ".to_string())), None);
        assert_eq!(na(None), None);
        assert_eq!(na(Some(" 2010 ".to_string())), Some("2010".to_string()));
    }

    #[test]
    fn short_plot_truncates_at_limit() {
        let short = "A heist inside dreams.";
        assert_eq!(short_plot(short), short);

        let long = "x".repeat(300);
        let truncated = short_plot(&long);
        assert_eq!(truncated.chars().count(), 253);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn cache_key_includes_filters() {
        let filters = SearchFilters {
            media_type: Some(MediaType::Movie),
            year: Some("2010".to_string()),
            page: Some(2),
        };
        assert_eq!(
            search_cache_key("inception", &filters),
            "search:q=inception&type=movie&y=2010&page=2"
        );
        assert_eq!(
            search_cache_key("inception", &SearchFilters::default()),
            "search:q=inception&type=&y=&page="
        );
    }

    #[test]
    fn normalize_requires_id_and_title() {
        let payload = OmdbDetail {
            imdb_id: Some("tt1375666".to_string()),
            title: Some("Inception".to_string()),
            year: Some("2010".to_string()),
            media_type: Some("movie".to_string()),
            poster: Some("N/A".to_string()),
            plot: Some("A thief who steals corporate secrets.".to_string()),
            genre: Some("Action, Sci-Fi".to_string()),
            director: Some("Christopher Nolan".to_string()),
            actors: None,
            runtime: Some("148 min".to_string()),
            imdb_rating: Some("8.8".to_string()),
            metascore: Some("N/A".to_string()),
            ratings: Vec::new(),
            response: "True".to_string(),
            error: None,
        };

        let detail = normalize_detail(&payload).unwrap();
        assert_eq!(detail.imdb_id, "tt1375666");
        assert_eq!(detail.poster_url, None);
        assert_eq!(detail.metascore, None);
        assert_eq!(detail.plot_short.as_deref(), detail.plot_full.as_deref());

        let mut missing_title = payload;
        missing_title.title = Some("N/A".to_string());
        assert!(normalize_detail(&missing_title).is_none());
    }
}
