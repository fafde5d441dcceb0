//! Watchlist management on top of a [`WatchlistStore`].
//!
//! The store only knows ids. This service is where titles are resolved
//! against the catalog and where a watched id is checked before it is
//! recorded.

use crate::error::{RecommendError, Result};
use crate::report::WatchReport;
use crate::traits::WatchlistStore;
use catalog::{Catalog, Movie, MovieId, UserId};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct WatchlistService {
    catalog: Arc<Catalog>,
    store: Arc<dyn WatchlistStore>,
}

impl WatchlistService {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn WatchlistStore>) -> Self {
        Self { catalog, store }
    }

    /// Register a user; `false` if the id was already taken
    pub fn register_user(&self, user_id: UserId) -> bool {
        let added = self.store.add_user(user_id);
        if added {
            info!("User {} added", user_id);
        } else {
            info!("User {} already exists", user_id);
        }
        added
    }

    /// Record the first catalog movie whose title contains `title`.
    ///
    /// Matching is case-insensitive and follows catalog order, so the same
    /// query always resolves to the same movie.
    ///
    /// # Errors
    /// - `UnknownUser` if the user was never registered
    /// - `MovieNotFound` if no title matches
    pub fn add_watched_by_title(&self, user_id: UserId, title: &str) -> Result<&Movie> {
        if !self.store.contains_user(user_id) {
            return Err(RecommendError::UnknownUser(user_id));
        }

        let Some(movie) = self.catalog.find_by_title(title) else {
            warn!("No movie matches '{}'", title);
            return Err(RecommendError::MovieNotFound {
                title: title.to_string(),
            });
        };

        self.store.add_watched(user_id, movie.id)?;
        info!("User {} watched '{}' ({})", user_id, movie.title, movie.id);
        Ok(movie)
    }

    /// Record `movie_id` after checking the catalog has it
    pub fn add_watched(&self, user_id: UserId, movie_id: MovieId) -> Result<()> {
        if !self.catalog.contains(movie_id) {
            return Err(RecommendError::InvalidWatchedReference { user_id, movie_id });
        }
        self.store.add_watched(user_id, movie_id)
    }

    /// `(id, title)` pairs in watch order
    pub fn list_watched(&self, user_id: UserId) -> Result<Vec<(MovieId, String)>> {
        self.store
            .list_watched(user_id)?
            .into_iter()
            .map(|movie_id| {
                self.catalog
                    .get_movie(movie_id)
                    .map(|movie| (movie_id, movie.title.clone()))
                    .ok_or(RecommendError::InvalidWatchedReference { user_id, movie_id })
            })
            .collect()
    }

    /// Distinct watched movies in catalog order
    pub fn watched_movies(&self, user_id: UserId) -> Result<Vec<&Movie>> {
        let watched = self.store.list_watched(user_id)?;
        Ok(self.catalog.subset(&watched))
    }

    /// Summary of the user's watched movies
    pub fn report(&self, user_id: UserId) -> Result<WatchReport> {
        Ok(WatchReport::build(&self.watched_movies(user_id)?))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryWatchlistStore;

    fn create_test_service() -> WatchlistService {
        let catalog = Catalog::from_movies(vec![
            Movie::new(1, "Toy Story", &["Animation", "Family"]),
            Movie::new(2, "Toy Story 2", &["Animation", "Family"]),
            Movie::new(3, "Heat", &["Action", "Crime"]),
        ])
        .unwrap();
        WatchlistService::new(Arc::new(catalog), Arc::new(InMemoryWatchlistStore::new()))
    }

    #[test]
    fn test_register_user() {
        let service = create_test_service();

        assert!(service.register_user(1));
        assert!(!service.register_user(1));
    }

    #[test]
    fn test_add_watched_by_title_takes_first_match() {
        let service = create_test_service();
        service.register_user(1);

        let movie = service.add_watched_by_title(1, "toy story").unwrap();
        assert_eq!(movie.id, 1);

        let movie = service.add_watched_by_title(1, "HEAT").unwrap();
        assert_eq!(movie.id, 3);

        assert_eq!(
            service.list_watched(1).unwrap(),
            vec![(1, "Toy Story".to_string()), (3, "Heat".to_string())]
        );
    }

    #[test]
    fn test_add_watched_by_title_not_found() {
        let service = create_test_service();
        service.register_user(1);

        assert_eq!(
            service.add_watched_by_title(1, "Casablanca"),
            Err(RecommendError::MovieNotFound {
                title: "Casablanca".to_string()
            })
        );
        assert!(service.list_watched(1).unwrap().is_empty());
    }

    #[test]
    fn test_add_watched_by_title_unknown_user() {
        let service = create_test_service();

        assert_eq!(
            service.add_watched_by_title(9, "Heat"),
            Err(RecommendError::UnknownUser(9))
        );
    }

    #[test]
    fn test_add_watched_rejects_unknown_movie() {
        let service = create_test_service();
        service.register_user(1);

        assert_eq!(
            service.add_watched(1, 99),
            Err(RecommendError::InvalidWatchedReference {
                user_id: 1,
                movie_id: 99
            })
        );
        service.add_watched(1, 2).unwrap();
        assert_eq!(service.list_watched(1).unwrap(), vec![(2, "Toy Story 2".to_string())]);
    }

    #[test]
    fn test_watched_movies_are_distinct_in_catalog_order() {
        let service = create_test_service();
        service.register_user(1);
        for movie_id in [3, 1, 3] {
            service.add_watched(1, movie_id).unwrap();
        }

        let ids: Vec<MovieId> = service
            .watched_movies(1)
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
