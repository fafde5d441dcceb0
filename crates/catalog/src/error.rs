//! Error types for the catalog crate.
//!
//! Loading a catalog can fail in three ways: the file cannot be read,
//! a CSV row cannot be decoded, or two rows claim the same movie id.

use crate::types::MovieId;
use thiserror::Error;

/// Errors that can occur while loading or building a catalog
///
/// The `#[derive(Error)]` macro from thiserror implements
/// `std::error::Error` and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O error occurred while opening or reading the catalog file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV record couldn't be decoded
    ///
    /// `line` is the 1-based line in the source file when the reader knows it.
    #[error("CSV error at line {line}: {reason}")]
    Csv { line: u64, reason: String },

    /// Two catalog rows share the same id
    #[error("Duplicate movie id {id} in catalog")]
    DuplicateMovie { id: MovieId },
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CatalogError::Io(io),
            _ => CatalogError::Csv { line, reason },
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
