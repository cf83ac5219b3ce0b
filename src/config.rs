use std::{fmt, path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::{error::AppResult, services::retry::RetryPolicy};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key (secret)
    pub tmdb_api_key: ApiKey,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix prepended to `poster_path` to build an image URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Movie table artifact (JSON array of `{id, title}`)
    #[serde(default = "default_movies_path")]
    pub movies_path: PathBuf,

    /// Similarity matrix artifact (JSON array of rows)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_poster_max_retries")]
    pub poster_max_retries: u32,

    #[serde(default = "default_poster_backoff_base_ms")]
    pub poster_backoff_base_ms: u64,

    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Number of recommendations returned per request
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_movies_path() -> PathBuf {
    PathBuf::from("movies_list.json")
}

fn default_similarity_path() -> PathBuf {
    PathBuf::from("similarity.json")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_poster_max_retries() -> u32 {
    3
}

fn default_poster_backoff_base_ms() -> u64 {
    1000
}

fn default_poster_timeout_secs() -> u64 {
    20
}

fn default_recommendation_count() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Retry policy for poster lookups built from the `POSTER_*` settings
    pub fn poster_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.poster_max_retries,
            backoff_base: Duration::from_millis(self.poster_backoff_base_ms),
            timeout: Duration::from_secs(self.poster_timeout_secs),
            ..RetryPolicy::default()
        }
    }
}

/// Source of the secret used to authenticate against the poster API
///
/// Resolved on every fetch so tests can inject a fake key without touching
/// the process environment.
pub trait SecretProvider: Send + Sync {
    fn api_key(&self) -> AppResult<String>;
}

/// API key wrapper that never prints its value
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl SecretProvider for ApiKey {
    fn api_key(&self) -> AppResult<String> {
        Ok(self.0.clone())
    }
}
