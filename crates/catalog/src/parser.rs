//! Parser for catalog CSV files.
//!
//! Expected header (extra columns are ignored):
//! `id,title,genres,vote_average,revenue`
//!
//! The genres column is itself comma-separated text inside a quoted field,
//! e.g. `"Action, Science Fiction"`. Missing optional fields become empty
//! or zero rather than failing the row.

use crate::error::Result;
use crate::types::*;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One CSV row as it appears on disk
#[derive(Debug, Deserialize)]
struct MovieRecord {
    id: MovieId,
    title: Option<String>,
    genres: Option<String>,
    vote_average: Option<f32>,
    revenue: Option<f64>,
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Movie {
            id: record.id,
            title: record.title.unwrap_or_default(),
            genres: parse_genres(record.genres.as_deref().unwrap_or("")),
            vote_average: record.vote_average.unwrap_or(0.0),
            revenue: record.revenue.unwrap_or(0.0),
        }
    }
}

/// Parse a catalog CSV file into movies, preserving row order
pub fn parse_catalog(path: &Path) -> Result<Vec<Movie>> {
    let reader = csv::Reader::from_path(path)?;
    collect_movies(reader)
}

/// Parse catalog CSV from any reader (used by tests and in-memory sources)
pub fn parse_catalog_reader<R: Read>(reader: R) -> Result<Vec<Movie>> {
    collect_movies(csv::Reader::from_reader(reader))
}

fn collect_movies<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();
    for record in reader.deserialize::<MovieRecord>() {
        movies.push(Movie::from(record?));
    }
    Ok(movies)
}

/// Split comma-separated genre text into tags
///
/// Example: "Action, Science Fiction" -> ["Action", "Science Fiction"]
///          "" -> []
fn parse_genres(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}
