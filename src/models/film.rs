use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Media kind as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
}

impl MediaType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            "episode" => Ok(Self::Episode),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// A rating from a third-party outlet (e.g. Rotten Tomatoes), kept as
/// an ordered list of source/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRating {
    pub source: String,
    pub value: String,
}

/// Fully normalized film details, ready to be persisted to the catalog.
/// Provider "N/A" sentinels have already been mapped to None.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmDetail {
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
}

/// One search result row, trimmed to what listings need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub imdb_id: String,
    pub title: String,
    pub year: Option<String>,
    pub media_type: Option<String>,
    pub poster_url: Option<String>,
}

/// Outcome of a catalog search. Provider failures are represented as
/// `ok == false` with an error string rather than an error type, so
/// they can be cached and returned like any other result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub ok: bool,
    pub results: Vec<SearchHit>,
    pub total_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    #[must_use]
    pub const fn failed(error: String) -> Self {
        Self {
            ok: false,
            results: Vec::new(),
            total_count: 0,
            error: Some(error),
        }
    }
}

/// Cached outcome of a detail lookup. `film == None` records a
/// provider "not found" so repeated bad ids don't hammer the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailOutcome {
    pub film: Option<FilmDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_round_trips() {
        for kind in [MediaType::Movie, MediaType::Series, MediaType::Episode] {
            assert_eq!(kind.as_str().parse::<MediaType>().unwrap(), kind);
        }
        assert!("documentary".parse::<MediaType>().is_err());
    }

    #[test]
    fn search_outcome_failure_shape() {
        let outcome = SearchOutcome::failed("Movie not found!".to_string());
        assert!(!outcome.ok);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.error.as_deref(), Some("Movie not found!"));
    }
}
