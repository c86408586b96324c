pub mod omdb;

use anyhow::Result;

use crate::models::film::MediaType;
use omdb::{OmdbDetail, OmdbSearchPage};

/// Optional narrowing applied to a catalog search.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub media_type: Option<MediaType>,
    pub year: Option<String>,
    pub page: Option<u32>,
}

/// Seam over the external film-data provider. The production
/// implementation is [`omdb::OmdbClient`]; tests substitute a stub so
/// gateway behavior can be exercised without network access.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Free-text title search. `Err` means the provider was unreachable;
    /// a "no results" reply is a successful page with `Response: False`.
    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<OmdbSearchPage>;

    /// Full detail lookup by external id. As with search, an unknown id
    /// is a successful reply with `Response: False`, not an `Err`.
    async fn detail(&self, imdb_id: &str) -> Result<OmdbDetail>;
}
