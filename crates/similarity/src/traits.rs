//! The seam shared by both similarity indices.
//!
//! The recommendation engine ranks candidates the same way regardless of
//! which index produced the scores, so ranking lives here as a provided
//! method and each index only supplies its row of scores.

use crate::error::Result;
use crate::types::{Candidate, CandidateSource};
use catalog::MovieId;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// A row of similarity scores against the whole catalog.
///
/// `Send + Sync` lets one index serve many concurrent requests; indices
/// are immutable after construction.
pub trait SimilarityIndex: Send + Sync {
    /// Returns the name of this index (for logging/debugging)
    fn name(&self) -> &str;

    /// Which candidate source this index reports
    fn source(&self) -> CandidateSource;

    /// Scores of `movie_id` against every catalog movie, in catalog order.
    ///
    /// The query movie itself is included; callers exclude it.
    ///
    /// # Errors
    /// `UnknownMovie` if `movie_id` has no row.
    fn similarity_row<'a>(
        &'a self,
        movie_id: MovieId,
    ) -> Result<Box<dyn Iterator<Item = (MovieId, f32)> + 'a>>;

    /// The `k` movies most similar to `movie_id`.
    ///
    /// ## Algorithm
    /// 1. Sort the full row by descending score (stable: ties keep catalog order)
    /// 2. Drop the query movie and every id in `excluded`, by id
    /// 3. Keep the first `k`
    #[instrument(skip_all, fields(index = self.name(), movie_id = movie_id, k = k))]
    fn top_similar(
        &self,
        movie_id: MovieId,
        excluded: &HashSet<MovieId>,
        k: usize,
    ) -> Result<Vec<Candidate>> {
        let mut row: Vec<(MovieId, f32)> = self.similarity_row(movie_id)?.collect();
        row.sort_by(|a, b| b.1.total_cmp(&a.1));

        let source = self.source();
        let candidates: Vec<Candidate> = row
            .into_iter()
            .filter(|(id, _)| *id != movie_id && !excluded.contains(id))
            .take(k)
            .map(|(id, score)| Candidate::new(id, source, score, movie_id))
            .collect();

        debug!(
            "{}: {} candidates for movie {}",
            self.name(),
            candidates.len(),
            movie_id
        );
        Ok(candidates)
    }
}
