use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use super::{MetadataProvider, SearchFilters};

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com";

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Type")]
    pub media_type: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchPage {
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchItem>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<String>,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl OmdbSearchPage {
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.response == "True"
    }
}

/// Flat detail payload as returned by `?i=<id>&plot=full`. String
/// fields may carry the provider's "N/A" sentinel; normalization
/// happens in the metadata service, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbDetail {
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Type")]
    pub media_type: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Actors")]
    pub actors: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Metascore")]
    pub metascore: Option<String>,
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<OmdbRating>,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl OmdbDetail {
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.response == "True"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbRating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("No OMDb API key configured; provider calls will fail");
        }
        Self {
            client,
            api_key,
            base_url,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OMDb API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbClient {
    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<OmdbSearchPage> {
        let mut url = format!(
            "{}/?apikey={}&s={}",
            self.base_url.trim_end_matches('/'),
            self.api_key,
            urlencoding::encode(query)
        );
        if let Some(kind) = filters.media_type {
            url.push_str(&format!("&type={kind}"));
        }
        if let Some(year) = &filters.year {
            url.push_str(&format!("&y={year}"));
        }
        if let Some(page) = filters.page {
            url.push_str(&format!("&page={page}"));
        }

        self.get_json(&url).await
    }

    async fn detail(&self, imdb_id: &str) -> Result<OmdbDetail> {
        let url = format!(
            "{}/?apikey={}&i={}&plot=full",
            self.base_url.trim_end_matches('/'),
            self.api_key,
            urlencoding::encode(imdb_id)
        );

        self.get_json(&url).await
    }
}
