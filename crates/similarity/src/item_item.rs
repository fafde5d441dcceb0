//! Item-Item Similarity Index - precomputed cosine matrix
//!
//! Computes every pairwise similarity once and keeps the full matrix.
//! The recommendation engine asks for a row per watched movie, across
//! every request, so the O(n²) build is paid once and each lookup after
//! that is O(1).
//!
//! ## Layout
//! Row-major `n * n` values of `f32`, where row `i` belongs to the movie at
//! catalog position `i`. The matrix is symmetric and its diagonal is
//! `MAX_SIMILARITY` by construction, even for movies without genre terms.
//!
//! Large catalogs should swap this for an approximate nearest-neighbor
//! structure behind the same `SimilarityIndex` trait.

use crate::error::{Result, SimilarityError};
use crate::features::FeatureSpace;
use crate::traits::SimilarityIndex;
use crate::types::{CandidateSource, MAX_SIMILARITY};
use catalog::{Catalog, MovieId};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{info, instrument};

/// Full movie × movie similarity matrix
#[derive(Debug, Clone)]
pub struct ItemItemSimilarityIndex {
    catalog: Arc<Catalog>,
    size: usize,
    matrix: Vec<f32>,
}

impl ItemItemSimilarityIndex {
    /// Precompute all pairwise similarities of `features`
    ///
    /// Rows are computed in parallel with Rayon; the result does not depend
    /// on scheduling.
    #[instrument(skip_all, fields(movies = features.len()))]
    pub fn new(catalog: Arc<Catalog>, features: &FeatureSpace) -> Self {
        debug_assert_eq!(catalog.len(), features.len());

        let vectors = features.vectors();
        let size = vectors.len();

        let rows: Vec<Vec<f32>> = (0..size)
            .into_par_iter()
            .map(|i| {
                (0..size)
                    .map(|j| {
                        if i == j {
                            MAX_SIMILARITY
                        } else {
                            vectors[i].cosine(&vectors[j])
                        }
                    })
                    .collect()
            })
            .collect();
        let matrix = rows.concat();

        info!(
            "Precomputed {}x{} item-item similarity matrix ({} entries)",
            size,
            size,
            matrix.len()
        );

        Self {
            catalog,
            size,
            matrix,
        }
    }

    /// Precomputed row of `movie_id`, indexed by catalog position
    pub fn row(&self, movie_id: MovieId) -> Result<&[f32]> {
        let pos = self.position(movie_id)?;
        Ok(&self.matrix[pos * self.size..(pos + 1) * self.size])
    }

    /// Similarity between two catalog movies
    pub fn similarity(&self, a: MovieId, b: MovieId) -> Result<f32> {
        let j = self.position(b)?;
        Ok(self.row(a)?[j])
    }

    /// Number of rows (and columns)
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn position(&self, movie_id: MovieId) -> Result<usize> {
        self.catalog
            .position(movie_id)
            .ok_or(SimilarityError::UnknownMovie(movie_id))
    }
}

impl SimilarityIndex for ItemItemSimilarityIndex {
    fn name(&self) -> &str {
        "ItemItemSimilarityIndex"
    }

    fn source(&self) -> CandidateSource {
        CandidateSource::ItemItem
    }

    fn similarity_row<'a>(
        &'a self,
        movie_id: MovieId,
    ) -> Result<Box<dyn Iterator<Item = (MovieId, f32)> + 'a>> {
        let row = self.row(movie_id)?;
        Ok(Box::new(
            self.catalog
                .iter()
                .zip(row)
                .map(|(movie, &score)| (movie.id, score)),
        ))
    }
}
