//! Example: List the movies most similar to a title
//!
//! Run with: cargo run --package similarity --example similar_movies -- "Inception"
//!
//! This example shows how to:
//! 1. Load the catalog
//! 2. Fit TF-IDF features over its genres
//! 3. Query both similarity indices for the same movie

use catalog::Catalog;
use similarity::{ContentSimilarityIndex, FeatureExtractor, ItemItemSimilarityIndex, SimilarityIndex};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let title = std::env::args().nth(1).unwrap_or_else(|| "Inception".to_string());

    println!("Loading movie catalog...");
    let start = Instant::now();
    let catalog = Arc::new(Catalog::load_from_file(Path::new("data/movies.csv"))?);
    println!("Loaded {} movies in {:?}\n", catalog.len(), start.elapsed());

    let movie = catalog
        .find_by_title(&title)
        .ok_or_else(|| anyhow::anyhow!("No movie matching '{}'", title))?;
    println!("Query: {} (ID: {}) [{}]\n", movie.title, movie.id, movie.genres.join(", "));

    let start = Instant::now();
    let features = Arc::new(FeatureExtractor::new().fit(&catalog)?);
    println!("Fitted {} terms in {:?}", features.dimensions(), start.elapsed());

    let content = ContentSimilarityIndex::new(catalog.clone(), features.clone());
    let start = Instant::now();
    let item_item = ItemItemSimilarityIndex::new(catalog.clone(), &features);
    println!("Built item-item matrix in {:?}\n", start.elapsed());

    let none = HashSet::new();
    for index in [&content as &dyn SimilarityIndex, &item_item] {
        println!("=== {} ===", index.name());
        for (i, candidate) in index.top_similar(movie.id, &none, 10)?.iter().enumerate() {
            if let Some(similar) = catalog.get_movie(candidate.movie_id) {
                println!("{:2}. {} (score: {:.3})", i + 1, similar.title, candidate.score);
            }
        }
        println!();
    }

    Ok(())
}
