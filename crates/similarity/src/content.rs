//! Content Similarity Index - on-demand cosine rows
//!
//! Computes one movie's similarity to the whole catalog when asked,
//! without keeping a matrix around. Only the most recently watched movie
//! is queried per recommendation, so a full matrix would be wasted memory.
//!
//! ## Cost
//! - O(catalog size) dot products per row
//! - O(1) extra memory: the row is a lazy iterator over the feature space

use crate::error::{Result, SimilarityError};
use crate::features::{FeatureExtractor, FeatureSpace};
use crate::traits::SimilarityIndex;
use crate::types::CandidateSource;
use catalog::{Catalog, MovieId};
use std::sync::Arc;

/// Content index over a fitted feature space
#[derive(Debug, Clone)]
pub struct ContentSimilarityIndex {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    catalog: Arc<Catalog>,

    /// Feature vectors by catalog position
    features: Arc<FeatureSpace>,
}

impl ContentSimilarityIndex {
    /// Create an index over features fitted on `catalog`
    pub fn new(catalog: Arc<Catalog>, features: Arc<FeatureSpace>) -> Self {
        debug_assert_eq!(catalog.len(), features.len());
        Self { catalog, features }
    }

    /// Fit features with `extractor` and wrap them in an index
    pub fn build(catalog: Arc<Catalog>, extractor: &FeatureExtractor) -> Result<Self> {
        let features = Arc::new(extractor.fit(&catalog)?);
        Ok(Self::new(catalog, features))
    }

    /// Cosine similarity between two catalog movies
    pub fn similarity(&self, a: MovieId, b: MovieId) -> Result<f32> {
        let va = self.features.vector(self.position(a)?);
        let vb = self.features.vector(self.position(b)?);
        match (va, vb) {
            (Some(va), Some(vb)) => Ok(va.cosine(vb)),
            (None, _) => Err(SimilarityError::UnknownMovie(a)),
            (_, None) => Err(SimilarityError::UnknownMovie(b)),
        }
    }

    fn position(&self, movie_id: MovieId) -> Result<usize> {
        self.catalog
            .position(movie_id)
            .ok_or(SimilarityError::UnknownMovie(movie_id))
    }
}

impl SimilarityIndex for ContentSimilarityIndex {
    fn name(&self) -> &str {
        "ContentSimilarityIndex"
    }

    fn source(&self) -> CandidateSource {
        CandidateSource::Content
    }

    fn similarity_row<'a>(
        &'a self,
        movie_id: MovieId,
    ) -> Result<Box<dyn Iterator<Item = (MovieId, f32)> + 'a>> {
        let query = self
            .features
            .vector(self.position(movie_id)?)
            .ok_or(SimilarityError::UnknownMovie(movie_id))?;

        let row = self
            .catalog
            .iter()
            .zip(self.features.vectors())
            .map(move |(movie, vector)| (movie.id, query.cosine(vector)));
        Ok(Box::new(row))
    }
}
