use std::{fs, path::Path};

use serde::de::DeserializeOwned;

use crate::{
    catalog::{Catalog, SimilarityMatrix},
    error::{AppError, AppResult},
    models::Movie,
};

/// Loads the movie table and similarity matrix artifacts from disk
///
/// Any missing file, malformed JSON or shape mismatch is reported as
/// `DataIntegrity`; the server refuses to start without a valid catalog.
pub fn load_catalog(movies_path: &Path, similarity_path: &Path) -> AppResult<Catalog> {
    let movies: Vec<Movie> = read_json(movies_path)?;
    let rows: Vec<Vec<f32>> = read_json(similarity_path)?;
    let similarity = SimilarityMatrix::from_rows(rows)?;

    let catalog = Catalog::new(movies, similarity)?;

    tracing::info!(
        movies = catalog.len(),
        movies_path = %movies_path.display(),
        similarity_path = %similarity_path.display(),
        "Loaded movie catalog"
    );

    Ok(catalog)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let raw = fs::read_to_string(path).map_err(|e| {
        AppError::DataIntegrity(format!("failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        AppError::DataIntegrity(format!("failed to parse {}: {}", path.display(), e))
    })
}
