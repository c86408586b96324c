use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub omdb: OmdbConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// SQLite connection string.
    pub database_path: String,

    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/reelist.db".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Session idle timeout in minutes.
    pub session_ttl_minutes: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4780,
            cors_allowed_origins: vec![
                "http://localhost:4780".to_string(),
                "http://127.0.0.1:4780".to_string(),
            ],
            secure_cookies: true,
            session_ttl_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OmdbConfig {
    /// OMDb API key; also settable via the OMDB_API_KEY environment
    /// variable.
    pub api_key: String,

    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,

    /// How long cached search results stay fresh.
    pub search_ttl_minutes: i64,

    /// How long cached film details stay fresh.
    pub detail_ttl_hours: i64,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: crate::clients::omdb::DEFAULT_BASE_URL.to_string(),
            request_timeout_seconds: 30,
            search_ttl_minutes: 60,
            detail_ttl_hours: 24,
        }
    }
}

impl Config {
    /// Loads config.toml from the working directory, falling back to
    /// defaults, then applies environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = Path::new("config.toml");
        let mut config = if path.exists() {
            info!("Loading config from: {}", path.display());
            Self::load_from_path(path)?
        } else {
            info!("No config file found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OMDB_API_KEY")
            && !key.is_empty()
        {
            self.omdb.api_key = key;
        }
        if let Ok(url) = std::env::var("DATABASE_URL")
            && !url.is_empty()
        {
            self.general.database_path = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }
        if self.omdb.search_ttl_minutes <= 0 || self.omdb.detail_ttl_hours <= 0 {
            anyhow::bail!("Cache TTLs must be positive");
        }
        if self.omdb.api_key.trim().is_empty() {
            warn!("No OMDb API key configured; film lookups will fail");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.omdb.search_ttl_minutes, 60);
        assert_eq!(config.omdb.detail_ttl_hours, 24);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [omdb]
            api_key = "abc123"

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.omdb.api_key, "abc123");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.general.database_path, "sqlite:data/reelist.db");
        assert_eq!(config.omdb.base_url, "https://www.omdbapi.com");
    }
}
