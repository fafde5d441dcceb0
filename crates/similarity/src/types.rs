//! Shared types produced by the similarity indices.

use catalog::MovieId;
use serde::Serialize;
use std::fmt;

/// Upper bound of every similarity score (a movie compared to itself)
pub const MAX_SIMILARITY: f32 = 1.0;

/// Which index produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateSource {
    /// Content Similarity Index, queried with the last watched movie
    Content,
    /// Item-Item Similarity Index, queried with every watched movie
    ItemItem,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSource::Content => write!(f, "content"),
            CandidateSource::ItemItem => write!(f, "item-item"),
        }
    }
}

/// A movie proposed by one of the indices, with the score it was ranked by
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub movie_id: MovieId,
    pub source: CandidateSource,
    pub score: f32,
    /// The watched movie whose row produced this candidate
    pub seed: MovieId,
}

impl Candidate {
    pub fn new(movie_id: MovieId, source: CandidateSource, score: f32, seed: MovieId) -> Self {
        Self {
            movie_id,
            source,
            score,
            seed,
        }
    }
}
