//! Catalog building and query logic.
//!
//! This module builds the Catalog from parsed movies and answers the
//! lookups the rest of the workspace needs:
//! - id → position index (built once, rejects duplicate ids)
//! - title search in catalog order
//! - the subset of movies a user has watched

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

impl Catalog {
    /// Build a catalog from movies in their source order
    ///
    /// Fails with `DuplicateMovie` if two movies share an id, since every
    /// other component keys on ids.
    pub fn from_movies(movies: Vec<Movie>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(movies.len());
        for (pos, movie) in movies.iter().enumerate() {
            if positions.insert(movie.id, pos).is_some() {
                return Err(CatalogError::DuplicateMovie { id: movie.id });
            }
        }
        Ok(Self { movies, positions })
    }

    /// Load a catalog from a CSV file
    ///
    /// Steps:
    /// 1. Parse every row into a Movie
    /// 2. Build the id → position index
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);

        let movies = parser::parse_catalog(path)?;
        let catalog = Self::from_movies(movies)?;

        info!("Loaded {} movies", catalog.len());
        Ok(catalog)
    }

    /// Find the first movie whose title contains `query`, ignoring case
    ///
    /// "First" means first in catalog order, so repeated searches for an
    /// ambiguous title always resolve to the same movie.
    pub fn find_by_title(&self, query: &str) -> Option<&Movie> {
        let query = query.to_lowercase();
        self.movies
            .iter()
            .find(|movie| movie.title.to_lowercase().contains(&query))
    }

    /// All movies whose title contains `query`, ignoring case, in catalog order
    pub fn search_titles(&self, query: &str) -> Vec<&Movie> {
        let query = query.to_lowercase();
        self.movies
            .iter()
            .filter(|movie| movie.title.to_lowercase().contains(&query))
            .collect()
    }

    /// The catalog restricted to `ids`
    ///
    /// Result is in catalog order with each movie at most once; ids that
    /// are not in the catalog are ignored.
    pub fn subset(&self, ids: &[MovieId]) -> Vec<&Movie> {
        let mut positions: Vec<usize> = ids
            .iter()
            .filter_map(|id| self.position(*id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        positions.sort_unstable();
        positions.into_iter().map(|pos| &self.movies[pos]).collect()
    }
}
