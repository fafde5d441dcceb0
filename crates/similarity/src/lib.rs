//! # Similarity Crate
//!
//! This crate turns the catalog's genre text into feature vectors and
//! answers "which movies are most like this one?" in two ways.
//!
//! ## Components
//!
//! ### Feature Extractor
//! TF-IDF over genre tokens, fitted once over the whole catalog:
//! - Fixed English stop-word removal
//! - Smoothed IDF, L2-normalized vectors
//! - Fails with `EmptyCorpus` when there is nothing to fit
//!
//! ### Content Similarity Index (on demand)
//! Cosine similarity of one movie against the catalog, computed per query
//! with no stored matrix. Used for the most recently watched movie.
//!
//! ### Item-Item Similarity Index (precomputed)
//! The full symmetric cosine matrix, built once in parallel. Used for every
//! watched movie, so each row lookup is O(1).
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{ContentSimilarityIndex, FeatureExtractor, ItemItemSimilarityIndex, SimilarityIndex};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load_from_file(path)?);
//! let features = Arc::new(FeatureExtractor::new().fit(&catalog)?);
//!
//! let content = ContentSimilarityIndex::new(catalog.clone(), features.clone());
//! let item_item = ItemItemSimilarityIndex::new(catalog.clone(), &features);
//!
//! let nearest = content.top_similar(movie_id, &watched, 5)?;
//! ```
//!
//! Both indices are immutable after construction and `Send + Sync`, so a
//! single `Arc` can serve concurrent requests.

// Public modules
pub mod error;
pub mod types;
pub mod traits;
pub mod features;
pub mod content;
pub mod item_item;

// Re-export commonly used types
pub use content::ContentSimilarityIndex;
pub use error::{Result, SimilarityError};
pub use features::{FeatureExtractor, FeatureSpace, FeatureVector};
pub use item_item::ItemItemSimilarityIndex;
pub use traits::SimilarityIndex;
pub use types::{Candidate, CandidateSource, MAX_SIMILARITY};

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{Catalog, Movie, MovieId};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn create_test_catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_movies(vec![
                Movie::new(1, "Alien", &["Horror", "Science Fiction"]),
                Movie::new(2, "Aliens", &["Action", "Science Fiction"]),
                Movie::new(3, "The Thing", &["Horror", "Mystery", "Science Fiction"]),
                Movie::new(4, "Paddington", &["Comedy", "Family"]),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_indices_agree_on_scores() {
        let catalog = create_test_catalog();
        let features = Arc::new(FeatureExtractor::new().fit(&catalog).unwrap());

        let content = ContentSimilarityIndex::new(catalog.clone(), features.clone());
        let item_item = ItemItemSimilarityIndex::new(catalog.clone(), &features);

        let content_row: Vec<(MovieId, f32)> = content.similarity_row(1).unwrap().collect();
        let matrix_row: Vec<(MovieId, f32)> = item_item.similarity_row(1).unwrap().collect();

        // Off-diagonal scores are the same cosine in both indices
        for (c, m) in content_row.iter().zip(&matrix_row).skip(1) {
            assert_eq!(c.0, m.0);
            assert_eq!(c.1, m.1);
        }
    }

    #[test]
    fn test_indices_usable_as_trait_objects() {
        let catalog = create_test_catalog();
        let features = Arc::new(FeatureExtractor::new().fit(&catalog).unwrap());

        let indices: Vec<Box<dyn SimilarityIndex>> = vec![
            Box::new(ContentSimilarityIndex::new(catalog.clone(), features.clone())),
            Box::new(ItemItemSimilarityIndex::new(catalog.clone(), &features)),
        ];

        for index in &indices {
            let top = index.top_similar(1, &HashSet::new(), 1).unwrap();
            assert_eq!(top[0].movie_id, 3, "{} ranked wrong movie", index.name());
        }
    }

    #[test]
    fn test_candidate_creation() {
        let candidate = Candidate::new(7, CandidateSource::ItemItem, 0.85, 3);
        assert_eq!(candidate.movie_id, 7);
        assert_eq!(candidate.source, CandidateSource::ItemItem);
        assert_eq!(candidate.score, 0.85);
        assert_eq!(candidate.seed, 3);
        assert_eq!(candidate.source.to_string(), "item-item");
    }
}
