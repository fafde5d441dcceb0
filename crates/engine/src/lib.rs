//! Recommendation engine and watchlist management.
//!
//! This crate provides:
//! - `WatchlistStore` trait and an in-memory implementation for watch histories
//! - `WatchlistService` for title-based watchlist updates and queries
//! - `RecommendationEngine` combining the content and item-item indices
//! - `WatchReport` summaries over a user's watched movies
//!
//! ## Architecture
//! User state is injected: the engine and the service share one
//! `Arc<dyn WatchlistStore>` and never own a user table themselves.
//! Catalog and indices are read-only, so a single engine serves
//! concurrent requests.
//!
//! ## Example Usage
//! ```ignore
//! use engine::{InMemoryWatchlistStore, RecommendationEngine, WatchlistService};
//! use similarity::FeatureExtractor;
//!
//! let store = Arc::new(InMemoryWatchlistStore::new());
//! let engine = RecommendationEngine::build(catalog.clone(), store.clone(), &FeatureExtractor::new())?;
//! let watchlist = WatchlistService::new(catalog, store);
//!
//! watchlist.register_user(1);
//! watchlist.add_watched_by_title(1, "Toy Story")?;
//! let recommendations = engine.recommend(1, 5)?;
//! ```

pub mod error;
pub mod traits;
pub mod store;
pub mod watchlist;
pub mod recommender;
pub mod report;

// Re-export main types
pub use error::{RecommendError, Result};
pub use recommender::{DEFAULT_RECOMMENDATIONS, MovieRecommendation, RecommendationEngine};
pub use report::{HistogramBin, WatchReport};
pub use store::InMemoryWatchlistStore;
pub use traits::WatchlistStore;
pub use watchlist::WatchlistService;
