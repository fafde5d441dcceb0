//! Feature Extractor: genre text → TF-IDF vectors.
//!
//! Every movie's genre tags are joined into one small document, tokenized,
//! stripped of stop words and weighted with TF-IDF over the whole catalog.
//! Vectors are L2-normalized so the dot product of two of them is their
//! cosine similarity.
//!
//! ## Weighting
//! - tf: raw count of the term in the movie's genre text
//! - idf: `ln((1 + n) / (1 + df)) + 1`, where `n` is the catalog size
//!
//! The vocabulary is fitted once over the full catalog and then frozen.
//! There is no incremental re-fit: a changed catalog needs a new `fit`.

use crate::error::{Result, SimilarityError};
use crate::types::MAX_SIMILARITY;
use catalog::Catalog;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{info, instrument};

/// English stop words removed before weighting
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
    "during", "each", "either", "else", "etc", "ever", "every", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "however", "if", "in", "into", "is", "it", "its",
    "itself", "just", "least", "less", "many", "may", "me", "might", "more", "most",
    "much", "must", "my", "myself", "neither", "no", "nor", "not", "now", "of", "off",
    "often", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out",
    "over", "own", "per", "rather", "same", "she", "should", "since", "so", "some",
    "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "though", "through", "thus", "to", "too",
    "under", "until", "up", "upon", "us", "very", "was", "we", "were", "what", "when",
    "where", "whether", "which", "while", "who", "whom", "whose", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Tokens shorter than this (in characters) are dropped
const MIN_TOKEN_CHARS: usize = 2;

/// Fits a TF-IDF vocabulary over a catalog's genre text
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    stop_words: HashSet<String>,
}

impl FeatureExtractor {
    /// Create an extractor with the built-in English stop-word list
    pub fn new() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Replace the stop-word list
    pub fn with_stop_words(mut self, words: &[&str]) -> Self {
        self.stop_words = words.iter().map(|w| w.to_lowercase()).collect();
        self
    }

    /// Lowercase, split on anything that isn't a word character, drop
    /// one-character tokens and stop words.
    ///
    /// Example: "Science Fiction, TV Movie" -> ["science", "fiction", "tv", "movie"]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }

    /// Fit the vocabulary and weight every movie in the catalog
    ///
    /// Vectors are stored by catalog position.
    ///
    /// # Errors
    /// `EmptyCorpus` if the catalog is empty or no term survives tokenization.
    #[instrument(skip_all, fields(movies = catalog.len()))]
    pub fn fit(&self, catalog: &Catalog) -> Result<FeatureSpace> {
        let documents: Vec<Vec<String>> = catalog
            .movies()
            .par_iter()
            .map(|movie| self.tokenize(&movie.genre_text()))
            .collect();

        // Document frequency per term; BTreeMap keeps the vocabulary sorted
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &documents {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(SimilarityError::EmptyCorpus {
                documents: documents.len(),
            });
        }

        let n = documents.len() as f32;
        let vocabulary: Vec<String> = doc_freq.keys().map(|t| t.to_string()).collect();
        let idf: Vec<f32> = doc_freq
            .values()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();
        let term_index: HashMap<String, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        let vectors: Vec<FeatureVector> = documents
            .par_iter()
            .map(|tokens| FeatureVector::weigh(tokens, &term_index, &idf))
            .collect();

        info!(
            "Fitted TF-IDF vocabulary of {} terms over {} movies",
            vocabulary.len(),
            vectors.len()
        );

        Ok(FeatureSpace {
            vocabulary,
            term_index,
            idf,
            vectors,
        })
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Unit-length TF-IDF weights over the frozen vocabulary
///
/// A movie with no surviving terms keeps the zero vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    weights: Vec<f32>,
}

impl FeatureVector {
    fn weigh(tokens: &[String], term_index: &HashMap<String, usize>, idf: &[f32]) -> Self {
        let mut weights = vec![0.0f32; idf.len()];
        for token in tokens {
            if let Some(&idx) = term_index.get(token) {
                weights[idx] += idf[idx];
            }
        }

        let norm = weights.iter().map(|w| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for w in weights.iter_mut() {
                *w /= norm;
            }
        }
        Self { weights }
    }

    /// Cosine similarity with another vector of the same space
    ///
    /// Both vectors are unit length (or zero), so this is the plain dot
    /// product, clamped against rounding above `MAX_SIMILARITY`.
    pub fn cosine(&self, other: &FeatureVector) -> f32 {
        self.dot(other).clamp(0.0, MAX_SIMILARITY)
    }

    pub fn dot(&self, other: &FeatureVector) -> f32 {
        self.weights
            .iter()
            .zip(&other.weights)
            .map(|(a, b)| a * b)
            .sum()
    }

    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.weights.iter().all(|w| *w == 0.0)
    }
}

/// Fitted vocabulary plus one vector per catalog position
#[derive(Debug, Clone)]
pub struct FeatureSpace {
    vocabulary: Vec<String>,
    term_index: HashMap<String, usize>,
    idf: Vec<f32>,
    vectors: Vec<FeatureVector>,
}

impl FeatureSpace {
    /// Vocabulary terms, sorted; a term's index is its vector dimension
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_index.get(term).map(|&idx| self.idf[idx])
    }

    /// Vector of the movie at a catalog position
    pub fn vector(&self, position: usize) -> Option<&FeatureVector> {
        self.vectors.get(position)
    }

    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    /// Number of vectors (equals the catalog size it was fitted on)
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
