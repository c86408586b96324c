//! Shared fixtures for the API integration tests: an in-memory app
//! instance and a stubbed metadata provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use reelist::clients::omdb::{OmdbDetail, OmdbRating, OmdbSearchItem, OmdbSearchPage};
use reelist::clients::{MetadataProvider, SearchFilters};
use reelist::config::Config;
use reelist::state::AppState;

/// Scripted stand-in for the OMDb client. Counts calls so tests can
/// assert that cache hits skip the provider.
#[derive(Default)]
pub struct StubProvider {
    pub search_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    details: HashMap<String, OmdbDetail>,
    search_page: Option<OmdbSearchPage>,
    fail_search: bool,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detail(mut self, detail: OmdbDetail) -> Self {
        let id = detail.imdb_id.clone().unwrap_or_default();
        self.details.insert(id, detail);
        self
    }

    pub fn with_search_page(mut self, page: OmdbSearchPage) -> Self {
        self.search_page = Some(page);
        self
    }

    pub fn with_failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn search_call_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_call_count(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for StubProvider {
    async fn search(&self, _query: &str, _filters: &SearchFilters) -> Result<OmdbSearchPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_search {
            anyhow::bail!("connection refused");
        }

        Ok(self.search_page.clone().unwrap_or_else(not_found_page))
    }

    async fn detail(&self, imdb_id: &str) -> Result<OmdbDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);

        Ok(self
            .details
            .get(imdb_id)
            .cloned()
            .unwrap_or_else(not_found_detail))
    }
}

pub fn not_found_page() -> OmdbSearchPage {
    OmdbSearchPage {
        search: Vec::new(),
        total_results: None,
        response: "False".to_string(),
        error: Some("Movie not found!".to_string()),
    }
}

pub fn not_found_detail() -> OmdbDetail {
    OmdbDetail {
        imdb_id: None,
        title: None,
        year: None,
        media_type: None,
        poster: None,
        plot: None,
        genre: None,
        director: None,
        actors: None,
        runtime: None,
        imdb_rating: None,
        metascore: None,
        ratings: Vec::new(),
        response: "False".to_string(),
        error: Some("Incorrect IMDb ID.".to_string()),
    }
}

pub fn inception_detail() -> OmdbDetail {
    OmdbDetail {
        imdb_id: Some("tt1375666".to_string()),
        title: Some("Inception".to_string()),
        year: Some("2010".to_string()),
        media_type: Some("movie".to_string()),
        poster: Some("https://example.com/inception.jpg".to_string()),
        plot: Some("x".repeat(300)),
        genre: Some("Action, Sci-Fi".to_string()),
        director: Some("Christopher Nolan".to_string()),
        actors: Some("N/A".to_string()),
        runtime: Some("148 min".to_string()),
        imdb_rating: Some("8.8".to_string()),
        metascore: Some("74".to_string()),
        ratings: vec![OmdbRating {
            source: "Rotten Tomatoes".to_string(),
            value: "87%".to_string(),
        }],
        response: "True".to_string(),
        error: None,
    }
}

pub fn search_page_with(items: Vec<OmdbSearchItem>) -> OmdbSearchPage {
    let total = items.len().to_string();
    OmdbSearchPage {
        search: items,
        total_results: Some(total),
        response: "True".to_string(),
        error: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub provider: Arc<StubProvider>,
}

pub async fn spawn_app_with(provider: StubProvider) -> TestApp {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;

    let provider = Arc::new(provider);
    let state = AppState::with_provider(config, provider.clone())
        .await
        .expect("Failed to create app state");

    TestApp {
        router: reelist::api::router(state.clone()),
        state,
        provider,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(StubProvider::new().with_detail(inception_detail())).await
}

/// Registers an account and returns its API key for authenticated
/// requests.
pub async fn register_user(app: &TestApp, username: &str) -> String {
    let body = post_json(
        app,
        "/api/auth/register",
        None,
        serde_json::json!({ "username": username, "password": "hunter2hunter2" }),
        StatusCode::OK,
    )
    .await;

    body["data"]["api_key"]
        .as_str()
        .expect("register response missing api_key")
        .to_string()
}

pub async fn get_json(
    app: &TestApp,
    uri: &str,
    api_key: Option<&str>,
    expected: StatusCode,
) -> serde_json::Value {
    send(app, "GET", uri, api_key, None, expected).await
}

pub async fn post_json(
    app: &TestApp,
    uri: &str,
    api_key: Option<&str>,
    body: serde_json::Value,
    expected: StatusCode,
) -> serde_json::Value {
    send(app, "POST", uri, api_key, Some(body), expected).await
}

pub async fn put_json(
    app: &TestApp,
    uri: &str,
    api_key: Option<&str>,
    body: serde_json::Value,
    expected: StatusCode,
) -> serde_json::Value {
    send(app, "PUT", uri, api_key, Some(body), expected).await
}

pub async fn delete_json(
    app: &TestApp,
    uri: &str,
    api_key: Option<&str>,
    expected: StatusCode,
) -> serde_json::Value {
    send(app, "DELETE", uri, api_key, None, expected).await
}

async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    api_key: Option<&str>,
    body: Option<serde_json::Value>,
    expected: StatusCode,
) -> serde_json::Value {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        status, expected,
        "{method} {uri}: unexpected status, body: {}",
        String::from_utf8_lossy(&bytes)
    );

    if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}
