//! In-memory watchlist store.
//!
//! ## Locking
//! The outer lock guards the user map and is only taken for writing when a
//! user registers. Each history sits behind its own lock, so an append
//! blocks readers and writers of that one user and nobody else.

use crate::error::{RecommendError, Result};
use crate::traits::WatchlistStore;
use catalog::{MovieId, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::debug;

type Watchlist = Arc<RwLock<Vec<MovieId>>>;

#[derive(Debug, Default)]
pub struct InMemoryWatchlistStore {
    users: RwLock<HashMap<UserId, Watchlist>>,
}

impl InMemoryWatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users
    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }

    fn watchlist(&self, user_id: UserId) -> Result<Watchlist> {
        self.users
            .read()
            .get(&user_id)
            .cloned()
            .ok_or(RecommendError::UnknownUser(user_id))
    }
}

impl WatchlistStore for InMemoryWatchlistStore {
    fn add_user(&self, user_id: UserId) -> bool {
        match self.users.write().entry(user_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::default());
                debug!("Registered user {}", user_id);
                true
            }
        }
    }

    fn contains_user(&self, user_id: UserId) -> bool {
        self.users.read().contains_key(&user_id)
    }

    fn add_watched(&self, user_id: UserId, movie_id: MovieId) -> Result<()> {
        // Outer read guard is released before the per-user write lock is taken
        let watchlist = self.watchlist(user_id)?;
        watchlist.write().push(movie_id);
        Ok(())
    }

    fn list_watched(&self, user_id: UserId) -> Result<Vec<MovieId>> {
        Ok(self.watchlist(user_id)?.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_add_user_is_idempotent() {
        let store = InMemoryWatchlistStore::new();

        assert!(store.add_user(1));
        store.add_watched(1, 42).unwrap();

        assert!(!store.add_user(1));
        assert_eq!(store.list_watched(1).unwrap(), vec![42]);
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_history_keeps_watch_order() {
        let store = InMemoryWatchlistStore::new();
        store.add_user(7);

        for movie_id in [30, 10, 20, 10] {
            store.add_watched(7, movie_id).unwrap();
        }

        assert_eq!(store.list_watched(7).unwrap(), vec![30, 10, 20, 10]);
    }

    #[test]
    fn test_unknown_user() {
        let store = InMemoryWatchlistStore::new();

        assert!(!store.contains_user(3));
        assert_eq!(store.add_watched(3, 1), Err(RecommendError::UnknownUser(3)));
        assert_eq!(store.list_watched(3), Err(RecommendError::UnknownUser(3)));
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let store = Arc::new(InMemoryWatchlistStore::new());
        store.add_user(1);
        store.add_user(2);

        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100u32 {
                        let user_id = 1 + (t % 2);
                        store.add_watched(user_id, t * 1000 + i).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let mut first = store.list_watched(1).unwrap();
        let second = store.list_watched(2).unwrap();
        assert_eq!(first.len(), 400);
        assert_eq!(second.len(), 400);

        // Each thread's own appends stay in order
        first.retain(|id| id / 1000 == 0);
        assert_eq!(first, (0..100).collect::<Vec<_>>());
    }
}
