use std::{cmp::Ordering, sync::Arc};

use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
    models::Recommendation,
    services::providers::PosterProvider,
};

pub const DEFAULT_RECOMMENDATION_COUNT: usize = 5;

/// Generates "more like this" recommendations from the similarity matrix
///
/// Ranks every other catalog entry by its precomputed similarity to the
/// selected title and attaches a poster URL to each of the top results.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    posters: Arc<dyn PosterProvider>,
    limit: usize,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, posters: Arc<dyn PosterProvider>) -> Self {
        Self {
            catalog,
            posters,
            limit: DEFAULT_RECOMMENDATION_COUNT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Most similar catalog positions for `title`, best first
    ///
    /// The selected row is excluded by position, as is any other row carrying
    /// the exact same title. Ties keep catalog order.
    pub fn rank(&self, title: &str) -> AppResult<Vec<(usize, f32)>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }

        let selected = self
            .catalog
            .position(title)
            .ok_or_else(|| AppError::Lookup(title.to_string()))?;
        let scores = self.catalog.scores(selected);

        let self_score = scores[selected];
        if scores
            .iter()
            .any(|score| descending(*score, self_score) == Ordering::Less)
        {
            tracing::warn!(
                title = %title,
                position = selected,
                self_score = self_score,
                "Self-similarity is not the row maximum; check the similarity artifact"
            );
        }

        let mut ranked: Vec<(usize, f32)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(position, _)| {
                *position != selected
                    && self
                        .catalog
                        .get(*position)
                        .map_or(false, |movie| movie.title != title)
            })
            .collect();

        // `sort_by` is stable, so equal scores stay in catalog order
        ranked.sort_by(|a, b| descending(a.1, b.1));
        ranked.truncate(self.limit);

        Ok(ranked)
    }

    /// Recommendations for `title` with their posters
    ///
    /// Posters are fetched one at a time; a failed fetch leaves `poster_url`
    /// empty and never fails the request.
    pub async fn recommend(&self, title: &str) -> AppResult<Vec<Recommendation>> {
        let ranked = self.rank(title)?;
        let mut recommendations = Vec::with_capacity(ranked.len());

        for (position, score) in ranked {
            let movie = self.catalog.get(position).ok_or_else(|| {
                AppError::Internal(format!("ranked position {} outside catalog", position))
            })?;

            let poster_url = self.posters.fetch_poster(movie.id).await;

            let recommendation = Recommendation {
                movie_id: movie.id,
                title: movie.title.clone(),
                score: score.is_finite().then_some(score),
                poster_url,
            };

            tracing::debug!(
                title = %recommendation.title,
                score = score,
                poster = %recommendation.poster_or_placeholder(),
                "Recommendation resolved"
            );

            recommendations.push(recommendation);
        }

        tracing::info!(
            title = %title,
            results = recommendations.len(),
            posters_missing = recommendations.iter().filter(|r| r.poster_url.is_none()).count(),
            provider = self.posters.name(),
            "Recommendations generated"
        );

        Ok(recommendations)
    }
}

/// Orders scores from highest to lowest; non-finite scores sort last
fn descending(a: f32, b: f32) -> Ordering {
    let key = |score: f32| {
        if score.is_finite() {
            score
        } else {
            f32::NEG_INFINITY
        }
    };
    key(b).total_cmp(&key(a))
}
