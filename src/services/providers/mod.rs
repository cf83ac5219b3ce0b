//! Poster image providers
//!
//! A provider turns a movie id into a fully-qualified poster image URL.
//! Lookups are best effort: failures are logged by the provider and
//! surface to callers as `None`, never as an error.

use crate::models::MovieId;

pub mod tmdb;

pub use tmdb::TmdbPosterProvider;

/// Trait for poster image sources
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Fetch the poster URL for a movie
    ///
    /// Returns `None` when the movie has no poster or the lookup failed.
    async fn fetch_poster(&self, movie_id: MovieId) -> Option<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
