//! Errors reported by recommendation and watchlist requests.

use catalog::{MovieId, UserId};
use similarity::SimilarityError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("user {0} is not registered")]
    UnknownUser(UserId),

    #[error("no movie in the catalog matches '{title}'")]
    MovieNotFound { title: String },

    /// A watchlist refers to a movie the catalog does not have
    #[error("user {user_id} has watched movie {movie_id}, which is not in the catalog")]
    InvalidWatchedReference { user_id: UserId, movie_id: MovieId },

    #[error(transparent)]
    Similarity(#[from] SimilarityError),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
