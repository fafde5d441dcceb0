//! Summary statistics over a user's watched movies.
//!
//! Built from the catalog subset of the watched ids (distinct movies,
//! catalog order). Only reads; an empty history gives an empty report.

use catalog::Movie;
use serde::Serialize;
use std::collections::HashMap;

/// Number of equal-width rating bins over `[0, MAX_RATING]`
pub const RATING_BINS: usize = 10;
pub const MAX_RATING: f32 = 10.0;
/// Genres listed in `top_genres`
pub const TOP_GENRES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f32,
    pub upper: f32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchReport {
    pub movie_count: usize,
    pub rating_histogram: Vec<HistogramBin>,
    /// `(vote_average, revenue)` per movie
    pub revenue_by_rating: Vec<(f32, f64)>,
    /// `(genre, count)`, most frequent first
    pub top_genres: Vec<(String, usize)>,
}

impl WatchReport {
    pub fn build(movies: &[&Movie]) -> Self {
        if movies.is_empty() {
            return Self::empty();
        }

        Self {
            movie_count: movies.len(),
            rating_histogram: rating_histogram(movies),
            revenue_by_rating: movies
                .iter()
                .map(|m| (m.vote_average, m.revenue))
                .collect(),
            top_genres: top_genres(movies, TOP_GENRES),
        }
    }

    pub fn empty() -> Self {
        Self {
            movie_count: 0,
            rating_histogram: Vec::new(),
            revenue_by_rating: Vec::new(),
            top_genres: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.movie_count == 0
    }
}

fn rating_histogram(movies: &[&Movie]) -> Vec<HistogramBin> {
    let width = MAX_RATING / RATING_BINS as f32;
    let mut counts = [0usize; RATING_BINS];

    for movie in movies {
        // 10.0 lands in the last bin; out-of-range votes clamp to the ends
        let bin = (movie.vote_average / width).floor().max(0.0) as usize;
        counts[bin.min(RATING_BINS - 1)] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistogramBin {
            lower: i as f32 * width,
            upper: (i + 1) as f32 * width,
            count,
        })
        .collect()
}

fn top_genres(movies: &[&Movie], limit: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for genre in movies.iter().flat_map(|m| &m.genres) {
        match slots.get(genre.as_str()) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(genre, counts.len());
                counts.push((genre.clone(), 1));
            }
        }
    }

    // Stable: equal counts keep first-appearance order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}
