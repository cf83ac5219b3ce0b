//! The Movie Database (TMDB) poster provider
//!
//! API Flow:
//! 1. Details: /3/movie/{id}?api_key=... → JSON with `poster_path`
//! 2. Image URL: {image_url}{poster_path}
//!
//! Every lookup goes to the network; nothing is cached.

use std::sync::Arc;

use crate::{
    config::SecretProvider,
    error::{AppError, AppResult},
    models::{MovieId, TmdbMovieDetails},
    services::{
        providers::PosterProvider,
        retry::{HttpRequest, HttpTransport, RetryPolicy},
    },
};

#[derive(Clone)]
pub struct TmdbPosterProvider {
    transport: Arc<dyn HttpTransport>,
    secrets: Arc<dyn SecretProvider>,
    retry_policy: RetryPolicy,
    api_url: String,
    image_url: String,
}

impl TmdbPosterProvider {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        secrets: Arc<dyn SecretProvider>,
        retry_policy: RetryPolicy,
        api_url: String,
        image_url: String,
    ) -> Self {
        Self {
            transport,
            secrets,
            retry_policy,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url,
        }
    }

    fn details_url(&self, movie_id: MovieId, api_key: &str) -> String {
        format!("{}/3/movie/{}?api_key={}", self.api_url, movie_id, api_key)
    }

    /// Builds the image URL from a `poster_path`, if one is present
    fn poster_url(&self, poster_path: Option<&str>) -> Option<String> {
        poster_path
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", self.image_url, path))
    }

    async fn try_fetch_poster(&self, movie_id: MovieId) -> AppResult<Option<String>> {
        let api_key = self.secrets.api_key()?;
        let request = HttpRequest::get(self.details_url(movie_id, &api_key));

        tracing::info!(
            movie_id = %movie_id,
            url = %self.details_url(movie_id, "***"),
            provider = self.name(),
            "Requesting poster details"
        );

        let response = self
            .retry_policy
            .execute(self.transport.as_ref(), &request)
            .await?;

        let details: TmdbMovieDetails = serde_json::from_str(&response.body).map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })?;

        Ok(self.poster_url(details.poster_path.as_deref()))
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbPosterProvider {
    async fn fetch_poster(&self, movie_id: MovieId) -> Option<String> {
        match self.try_fetch_poster(movie_id).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                tracing::debug!(movie_id = %movie_id, "No poster available");
                None
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    movie_id = %movie_id,
                    provider = self.name(),
                    "Error fetching poster"
                );
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
