//! In-memory movie catalog
//!
//! Holds the movie table and its precomputed similarity matrix. Both are
//! loaded once at startup and shared read-only for the lifetime of the
//! process, so lookups need no locking.

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

pub mod loader;
pub mod similarity;

pub use loader::load_catalog;
pub use similarity::SimilarityMatrix;

#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    similarity: SimilarityMatrix,
}

impl Catalog {
    /// Pairs a movie table with its similarity matrix
    ///
    /// Fails with `DataIntegrity` when the table is empty or the matrix
    /// dimension differs from the number of movies.
    pub fn new(movies: Vec<Movie>, similarity: SimilarityMatrix) -> AppResult<Self> {
        if movies.is_empty() {
            return Err(AppError::DataIntegrity(
                "movie catalog is empty".to_string(),
            ));
        }

        if similarity.dimension() != movies.len() {
            return Err(AppError::DataIntegrity(format!(
                "similarity matrix is {0}x{0} but catalog has {1} movies",
                similarity.dimension(),
                movies.len()
            )));
        }

        Ok(Self { movies, similarity })
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, position: usize) -> Option<&Movie> {
        self.movies.get(position)
    }

    /// Position of the first movie whose title matches exactly
    pub fn position(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|movie| movie.title == title)
    }

    /// Similarity scores of the movie at `position` against the whole catalog
    pub fn scores(&self, position: usize) -> &[f32] {
        self.similarity.row(position)
    }

    /// Case-insensitive substring search over titles, in catalog order
    pub fn search(&self, query: &str) -> Vec<&Movie> {
        let needle = query.trim().to_lowercase();
        self.movies
            .iter()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .collect()
    }
}
