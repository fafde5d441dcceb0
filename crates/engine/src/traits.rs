//! The storage seam for per-user watch histories.
//!
//! The engine never owns user state; it is handed a store at construction,
//! so any backend that honors these semantics can sit behind it.

use crate::error::Result;
use catalog::{MovieId, UserId};

/// Ordered watch history per registered user.
///
/// ## Contract
/// - `add_watched` appends, so `list_watched` returns ids in watch order
/// - Appends for one user are serialized; other users are unaffected
/// - Every operation on an unregistered user fails with `UnknownUser`
pub trait WatchlistStore: Send + Sync {
    /// Register `user_id` with an empty history.
    ///
    /// Returns `false` (and keeps the existing history) if already registered.
    fn add_user(&self, user_id: UserId) -> bool;

    fn contains_user(&self, user_id: UserId) -> bool;

    /// Append `movie_id` to the user's history.
    ///
    /// The store does not consult the catalog; that is the caller's job.
    fn add_watched(&self, user_id: UserId, movie_id: MovieId) -> Result<()>;

    /// Snapshot of the user's history in watch order
    fn list_watched(&self, user_id: UserId) -> Result<Vec<MovieId>>;
}
