use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// TMDB movie identifier, used to query the poster API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
}

/// One recommended movie returned to the client
///
/// `poster_url` is `None` when no poster could be fetched; clients show
/// [`POSTER_PLACEHOLDER`] in its place. `score` is `None` when the stored
/// similarity is not a finite number (NaN or infinite).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub score: Option<f32>,
    pub poster_url: Option<String>,
}

pub const POSTER_PLACEHOLDER: &str = "Poster not available";

impl Recommendation {
    /// Poster URL, or the placeholder text when none is available
    pub fn poster_or_placeholder(&self) -> &str {
        self.poster_url.as_deref().unwrap_or(POSTER_PLACEHOLDER)
    }
}

/// Request body for the recommendations endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
}

/// Response for the recommendations endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub selected: String,
    pub recommendations: Vec<Recommendation>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of the TMDB `GET /3/movie/{id}` payload we care about
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
}
