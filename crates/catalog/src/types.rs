//! Core domain types for the movie catalog.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - Structs with public fields
//! - Derive macros for common traits
//! - A Vec for catalog order plus a HashMap for id lookups

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a user of the watchlist store
pub type UserId = u32;

/// Catalog-unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Movie
// =============================================================================

/// Represents a movie in the catalog.
///
/// Movies are immutable once the catalog is built; everything downstream
/// holds them through `&Movie` or an `Arc<Catalog>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre tags in source order, e.g. `["Action", "Science Fiction"]`
    ///
    /// Empty when the source row carried no genre text.
    pub genres: Vec<String>,
    pub vote_average: f32,
    pub revenue: f64,
}

impl Movie {
    /// Create a movie with no rating or revenue information
    pub fn new(id: MovieId, title: impl Into<String>, genres: &[&str]) -> Self {
        Self {
            id,
            title: title.into(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            vote_average: 0.0,
            revenue: 0.0,
        }
    }

    /// Genre tags joined into a single whitespace-separated document
    ///
    /// This is the text the feature extractor tokenizes.
    pub fn genre_text(&self) -> String {
        self.genres.join(" ")
    }
}

// =============================================================================
// Catalog - The Frozen Movie Table
// =============================================================================

/// Ordered movie table with an id → position index.
///
/// Positions are stable for the lifetime of the catalog, so similarity
/// indices can store rows by position and translate back to ids here.
///
/// Rust concepts demonstrated:
/// - `Vec<T>` keeps catalog order (title search and reports depend on it)
/// - `HashMap<K, V>` gives O(1) id lookups
/// - Borrowing: methods return `&T` (references) not `T` (owned values)
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
    pub(crate) positions: HashMap<MovieId, usize>,
}

impl Catalog {
    /// Get a movie by ID
    ///
    /// Returns `Option<&Movie>`:
    /// - `Some(&movie)` if the id is in the catalog (borrowing it)
    /// - `None` otherwise
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.position(id).map(|pos| &self.movies[pos])
    }

    /// Get the catalog position of a movie
    pub fn position(&self, id: MovieId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Get the movie stored at a catalog position
    pub fn movie_at(&self, position: usize) -> Option<&Movie> {
        self.movies.get(position)
    }

    /// Check whether a movie id is part of the catalog
    pub fn contains(&self, id: MovieId) -> bool {
        self.positions.contains_key(&id)
    }

    /// All movies in catalog order
    ///
    /// Rust concept: `&[T]` is a slice (view into a vector)
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Movie> {
        self.movies.iter()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
