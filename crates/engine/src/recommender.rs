//! Recommendation Engine - hybrid content + item-item recommendations
//!
//! ## Request flow
//! ```text
//! recommend(user, k)
//!     │
//!     ├─► watch history from the store (UnknownUser if unregistered)
//!     │
//!     ├─► content candidates: last watched movie, top k
//!     ├─► item-item candidates: every watched movie in order, top k each
//!     │
//!     └─► merge by movie id (content first), truncate to k
//! ```
//!
//! Both candidate paths exclude the query movie and everything already
//! watched by id, through `SimilarityIndex::top_similar`.

use crate::error::{RecommendError, Result};
use crate::traits::WatchlistStore;
use catalog::{Catalog, MovieId, UserId};
use serde::Serialize;
use similarity::{
    Candidate, CandidateSource, ContentSimilarityIndex, FeatureExtractor,
    ItemItemSimilarityIndex, SimilarityIndex,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Recommendations returned when the caller does not ask for a count
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// Final recommendation returned to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    pub score: f32,
    pub source: CandidateSource,
    /// Watched movie whose similarity row proposed this one
    pub seed: MovieId,
}

/// Answers recommendation requests over shared, read-only indices
///
/// Cloning is cheap; every component sits behind an `Arc`.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    content: Arc<dyn SimilarityIndex>,
    item_item: Arc<dyn SimilarityIndex>,
    store: Arc<dyn WatchlistStore>,
    default_limit: usize,
}

impl RecommendationEngine {
    /// Assemble an engine from already built indices
    pub fn new(
        catalog: Arc<Catalog>,
        content: Arc<dyn SimilarityIndex>,
        item_item: Arc<dyn SimilarityIndex>,
        store: Arc<dyn WatchlistStore>,
    ) -> Self {
        Self {
            catalog,
            content,
            item_item,
            store,
            default_limit: DEFAULT_RECOMMENDATIONS,
        }
    }

    /// Fit features on `catalog` and build both indices.
    ///
    /// # Errors
    /// `EmptyCorpus` if the catalog yields no vocabulary; no engine is built.
    #[instrument(skip_all, fields(movies = catalog.len()))]
    pub fn build(
        catalog: Arc<Catalog>,
        store: Arc<dyn WatchlistStore>,
        extractor: &FeatureExtractor,
    ) -> Result<Self> {
        let features = Arc::new(extractor.fit(&catalog)?);
        let content = Arc::new(ContentSimilarityIndex::new(catalog.clone(), features.clone()));
        let item_item = Arc::new(ItemItemSimilarityIndex::new(catalog.clone(), &features));

        info!(
            "Recommendation engine ready: {} movies, {} feature dimensions",
            catalog.len(),
            features.dimensions()
        );
        Ok(Self::new(catalog, content, item_item, store))
    }

    /// Set the count used by `recommend_default`
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn recommend_default(&self, user_id: UserId) -> Result<Vec<MovieRecommendation>> {
        self.recommend(user_id, self.default_limit)
    }

    /// Up to `k` movies for `user_id`, best first.
    ///
    /// ## Guarantees
    /// - No watched movie is recommended
    /// - No movie appears twice
    /// - At most `k` results; none for an empty history
    /// - Same catalog and history give the same output
    ///
    /// # Errors
    /// - `UnknownUser` if the user was never registered
    /// - `InvalidWatchedReference` if the history names a movie the catalog lacks
    #[instrument(skip(self))]
    pub fn recommend(&self, user_id: UserId, k: usize) -> Result<Vec<MovieRecommendation>> {
        let watched = self.store.list_watched(user_id)?;
        let Some(&last_watched) = watched.last() else {
            debug!("User {} has no watch history", user_id);
            return Ok(Vec::new());
        };
        self.validate_watched(user_id, &watched)?;

        if k == 0 {
            return Ok(Vec::new());
        }
        // No list can outgrow the catalog
        let k = k.min(self.catalog.len());

        let excluded: HashSet<MovieId> = watched.iter().copied().collect();

        let content_candidates = self.content.top_similar(last_watched, &excluded, k)?;
        let item_item_candidates = self.item_item_candidates(&watched, &excluded, k)?;
        debug!(
            "Candidates: content={}, item_item={}",
            content_candidates.len(),
            item_item_candidates.len()
        );

        let merged = merge_candidates(content_candidates, item_item_candidates, k);
        debug_assert!(merged.iter().all(|c| !excluded.contains(&c.movie_id)));

        Ok(self.to_recommendations(merged))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn WatchlistStore> {
        &self.store
    }

    fn validate_watched(&self, user_id: UserId, watched: &[MovieId]) -> Result<()> {
        match watched.iter().find(|id| !self.catalog.contains(**id)) {
            Some(&movie_id) => Err(RecommendError::InvalidWatchedReference { user_id, movie_id }),
            None => Ok(()),
        }
    }

    /// Top `k` per watched movie, concatenated in watch order
    ///
    /// Repeats across different watched movies are left for the merge.
    fn item_item_candidates(
        &self,
        watched: &[MovieId],
        excluded: &HashSet<MovieId>,
        k: usize,
    ) -> Result<Vec<Candidate>> {
        let mut candidates = Vec::new();
        for &movie_id in watched {
            candidates.extend(self.item_item.top_similar(movie_id, excluded, k)?);
        }
        Ok(candidates)
    }

    fn to_recommendations(&self, candidates: Vec<Candidate>) -> Vec<MovieRecommendation> {
        candidates
            .into_iter()
            .filter_map(|candidate| {
                let movie = self.catalog.get_movie(candidate.movie_id)?;
                Some(MovieRecommendation {
                    movie_id: candidate.movie_id,
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    score: candidate.score,
                    source: candidate.source,
                    seed: candidate.seed,
                })
            })
            .collect()
    }
}

/// Content candidates first, then item-item, each in ranked order.
///
/// The first candidate seen for a movie id wins. Keyed on id, so distinct
/// movies sharing a title both survive.
fn merge_candidates(content: Vec<Candidate>, item_item: Vec<Candidate>, k: usize) -> Vec<Candidate> {
    let mut seen: HashSet<MovieId> = HashSet::new();
    content
        .into_iter()
        .chain(item_item)
        .filter(|candidate| seen.insert(candidate.movie_id))
        .take(k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryWatchlistStore;
    use catalog::Movie;
    use similarity::SimilarityError;

    fn create_engine(movies: Vec<Movie>) -> RecommendationEngine {
        let catalog = Arc::new(Catalog::from_movies(movies).unwrap());
        let store = Arc::new(InMemoryWatchlistStore::new());
        RecommendationEngine::build(catalog, store, &FeatureExtractor::new()).unwrap()
    }

    fn create_test_engine() -> RecommendationEngine {
        create_engine(vec![
            Movie::new(1, "A", &["Action"]),
            Movie::new(2, "B", &["Action"]),
            Movie::new(3, "C", &["Comedy"]),
        ])
    }

    fn watch(engine: &RecommendationEngine, user_id: UserId, movies: &[MovieId]) {
        engine.store().add_user(user_id);
        for &movie_id in movies {
            engine.store().add_watched(user_id, movie_id).unwrap();
        }
    }

    fn ids(recommendations: &[MovieRecommendation]) -> Vec<MovieId> {
        recommendations.iter().map(|r| r.movie_id).collect()
    }

    #[test]
    fn test_recommends_same_genre() {
        let engine = create_test_engine();
        watch(&engine, 1, &[1]);

        let recommendations = engine.recommend(1, 1).unwrap();

        assert_eq!(ids(&recommendations), vec![2]);
        assert_eq!(recommendations[0].title, "B");
        assert_eq!(recommendations[0].source, CandidateSource::Content);
        assert_eq!(recommendations[0].seed, 1);
    }

    #[test]
    fn test_unknown_user() {
        let engine = create_test_engine();

        assert_eq!(engine.recommend(42, 5), Err(RecommendError::UnknownUser(42)));
        assert_eq!(engine.recommend(42, 0), Err(RecommendError::UnknownUser(42)));
    }

    #[test]
    fn test_empty_history_gives_no_recommendations() {
        let engine = create_test_engine();
        watch(&engine, 1, &[]);

        for k in 0..5 {
            assert!(engine.recommend(1, k).unwrap().is_empty());
        }
    }

    #[test]
    fn test_zero_limit() {
        let engine = create_test_engine();
        watch(&engine, 1, &[1]);

        assert!(engine.recommend(1, 0).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_watched_reference() {
        let engine = create_test_engine();
        // The store itself does not consult the catalog
        watch(&engine, 1, &[1, 99]);

        assert_eq!(
            engine.recommend(1, 3),
            Err(RecommendError::InvalidWatchedReference {
                user_id: 1,
                movie_id: 99
            })
        );
    }

    #[test]
    fn test_postconditions_hold_for_all_limits() {
        let engine = create_engine(vec![
            Movie::new(1, "Heat", &["Action", "Crime", "Drama"]),
            Movie::new(2, "Ronin", &["Action", "Thriller"]),
            Movie::new(3, "Amelie", &["Comedy", "Romance"]),
            Movie::new(4, "Collateral", &["Crime", "Drama", "Thriller"]),
            Movie::new(5, "Notting Hill", &["Comedy", "Drama", "Romance"]),
            Movie::new(6, "Alien", &["Horror", "Science Fiction"]),
        ]);
        watch(&engine, 1, &[1, 3, 1]);
        watch(&engine, 2, &[6]);

        for user_id in [1, 2] {
            let watched: HashSet<MovieId> =
                engine.store().list_watched(user_id).unwrap().into_iter().collect();

            for k in 0..8 {
                let recommended = ids(&engine.recommend(user_id, k).unwrap());
                let unique: HashSet<MovieId> = recommended.iter().copied().collect();

                assert!(recommended.len() <= k);
                assert_eq!(unique.len(), recommended.len(), "duplicate ids for k={}", k);
                assert!(recommended.iter().all(|id| !watched.contains(id)));
            }
        }
    }

    #[test]
    fn test_ranking_follows_last_watched_movie() {
        let engine = create_engine(vec![
            Movie::new(1, "Heat", &["Action", "Crime", "Drama"]),
            Movie::new(2, "Ronin", &["Action", "Thriller"]),
            Movie::new(3, "Amelie", &["Comedy", "Romance"]),
            Movie::new(4, "Collateral", &["Crime", "Drama", "Thriller"]),
            Movie::new(5, "Notting Hill", &["Comedy", "Drama", "Romance"]),
        ]);
        watch(&engine, 1, &[1, 3]);

        let recommended = ids(&engine.recommend(1, 3).unwrap());

        // Amelie was watched last, so the romance comes first
        assert_eq!(recommended[0], 5);
        assert_eq!(recommended.len(), 3);
    }

    #[test]
    fn test_limit_larger_than_catalog() {
        let engine = create_test_engine();
        watch(&engine, 1, &[1, 3]);

        assert_eq!(ids(&engine.recommend(1, usize::MAX).unwrap()), vec![2]);
        assert_eq!(ids(&engine.recommend(1, usize::MAX / 2).unwrap()), vec![2]);
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let engine = create_test_engine();
        watch(&engine, 1, &[3, 1]);

        let first = engine.recommend(1, 5).unwrap();
        let second = engine.recommend(1, 5).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_same_title_movies_are_not_collapsed() {
        let engine = create_engine(vec![
            Movie::new(1, "Big", &["Comedy", "Fantasy"]),
            Movie::new(2, "Twins", &["Comedy"]),
            Movie::new(3, "Twins", &["Comedy"]),
            Movie::new(4, "Se7en", &["Crime", "Thriller"]),
        ]);
        watch(&engine, 1, &[1]);

        let recommended = ids(&engine.recommend(1, 2).unwrap());

        assert_eq!(recommended, vec![2, 3]);
    }

    #[test]
    fn test_recommend_default_uses_limit() {
        let engine = create_test_engine();
        watch(&engine, 1, &[1]);

        assert_eq!(engine.default_limit(), DEFAULT_RECOMMENDATIONS);
        assert_eq!(engine.recommend_default(1).unwrap().len(), 2);

        let engine = engine.with_default_limit(1);
        assert_eq!(ids(&engine.recommend_default(1).unwrap()), vec![2]);
    }

    #[test]
    fn test_build_fails_on_empty_catalog() {
        let result = RecommendationEngine::build(
            Arc::new(Catalog::default()),
            Arc::new(InMemoryWatchlistStore::new()),
            &FeatureExtractor::new(),
        );

        assert!(matches!(
            result,
            Err(RecommendError::Similarity(SimilarityError::EmptyCorpus { .. }))
        ));
    }

    #[test]
    fn test_merge_candidates_content_first_dedup_by_id() {
        let content = vec![
            Candidate::new(5, CandidateSource::Content, 0.9, 1),
            Candidate::new(6, CandidateSource::Content, 0.4, 1),
        ];
        let item_item = vec![
            Candidate::new(6, CandidateSource::ItemItem, 0.95, 2),
            Candidate::new(7, CandidateSource::ItemItem, 0.8, 2),
            Candidate::new(8, CandidateSource::ItemItem, 0.7, 1),
        ];

        let merged = merge_candidates(content, item_item, 3);
        let merged_ids: Vec<MovieId> = merged.iter().map(|c| c.movie_id).collect();

        assert_eq!(merged_ids, vec![5, 6, 7]);
        // First seen wins, even against a higher item-item score
        assert_eq!(merged[1].source, CandidateSource::Content);
        assert_eq!(merged[1].score, 0.4);
    }

    #[test]
    fn test_merge_candidates_handles_empty_inputs() {
        assert!(merge_candidates(Vec::new(), Vec::new(), 5).is_empty());

        let item_item = vec![Candidate::new(3, CandidateSource::ItemItem, 0.5, 1)];
        let merged = merge_candidates(Vec::new(), item_item, 5);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, CandidateSource::ItemItem);
    }
}
