use crate::error::{AppError, AppResult};

/// Dense N×N similarity scores, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dimension: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds a matrix from nested rows, rejecting anything that is not square
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(AppError::DataIntegrity(format!(
                    "similarity row {} has {} columns, expected {}",
                    index,
                    row.len(),
                    dimension
                )));
            }
            scores.extend(row);
        }

        Ok(Self { dimension, scores })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Scores of `index` against every catalog position
    ///
    /// Panics if `index` is out of range; callers only pass positions
    /// obtained from the catalog, whose length equals the dimension.
    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.dimension;
        &self.scores[start..start + self.dimension]
    }
}
