use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;

use crate::clients::MetadataProvider;
use crate::clients::omdb::OmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::metadata::MetadataService;
use crate::services::playlist::PlaylistService;
use crate::services::rating::RatingService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
    pub metadata: MetadataService,
    pub playlists: PlaylistService,
    pub ratings: RatingService,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let client = build_shared_http_client(config.omdb.request_timeout_seconds)?;
        let provider: Arc<dyn MetadataProvider> = Arc::new(OmdbClient::new(
            client,
            config.omdb.api_key.clone(),
            config.omdb.base_url.clone(),
        ));

        Self::with_provider(config, provider).await
    }

    /// Builds state with a caller-supplied provider. Tests use this to
    /// substitute a stub for the real OMDb client.
    pub async fn with_provider(
        config: Config,
        provider: Arc<dyn MetadataProvider>,
    ) -> Result<Arc<Self>> {
        let store = Store::new(&config.general.database_path).await?;

        let metadata = MetadataService::new(
            store.clone(),
            provider,
            config.omdb.search_ttl_minutes,
            config.omdb.detail_ttl_hours,
        );
        let playlists = PlaylistService::new(store.clone(), metadata.clone());
        let ratings = RatingService::new(store.clone());

        Ok(Arc::new(Self {
            config: Arc::new(config),
            store,
            metadata,
            playlists,
            ratings,
            start_time: std::time::Instant::now(),
        }))
    }
}

/// One HTTP client for all outbound provider calls, so connection
/// pooling is shared.
pub fn build_shared_http_client(timeout_seconds: u64) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent("Reelist/1.0")
        .pool_max_idle_per_host(8)
        .build()?)
}
