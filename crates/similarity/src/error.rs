//! Error types for feature extraction and similarity lookups.

use catalog::MovieId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimilarityError {
    /// No document produced a single vocabulary term
    ///
    /// Raised for an empty catalog and for a catalog whose genre text is
    /// entirely empty or stop words. No partial index is built.
    #[error("Cannot build feature vocabulary from {documents} documents: no terms")]
    EmptyCorpus { documents: usize },

    /// The queried movie id has no row in the index
    #[error("Movie {0} is not in the similarity index")]
    UnknownMovie(MovieId),
}

pub type Result<T> = std::result::Result<T, SimilarityError>;
