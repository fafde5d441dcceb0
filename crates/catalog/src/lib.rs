//! # Catalog Crate
//!
//! This crate loads the movie catalog and answers id and title lookups.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Catalog, MovieId, UserId)
//! - **parser**: Parse the catalog CSV into Movie records
//! - **index**: Build the id → position index and run title/subset queries
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("data/movies.csv"))?;
//!
//! let movie = catalog.find_by_title("inception").unwrap();
//! println!("{} is at position {:?}", movie.title, catalog.position(movie.id));
//! ```
//!
//! The catalog is frozen once built: positions never move, which is what
//! lets the similarity indices address rows by position.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{Catalog, Movie, MovieId, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();

        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(catalog.get_movie(1).is_none());
        assert!(catalog.find_by_title("anything").is_none());
    }

    #[test]
    fn test_get_movie() {
        let catalog = Catalog::from_movies(vec![Movie {
            id: 603,
            title: "The Matrix".to_string(),
            genres: vec!["Action".to_string(), "Science Fiction".to_string()],
            vote_average: 8.2,
            revenue: 463_517_383.0,
        }])
        .unwrap();

        let movie = catalog.get_movie(603).unwrap();
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.genre_text(), "Action Science Fiction");
        assert!(catalog.contains(603));
    }

    #[test]
    fn test_load_dataset() -> anyhow::Result<()> {
        // This test requires the actual dataset file
        // Place the catalog CSV at ../../data/movies.csv
        let path = std::path::Path::new("../../data/movies.csv");

        if path.exists() {
            let catalog = Catalog::load_from_file(path)?;
            assert!(!catalog.is_empty());
        }
        Ok(())
    }
}
