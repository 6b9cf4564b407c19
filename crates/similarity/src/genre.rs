//! Content-based similarity from genre tags.
//!
//! Every movie becomes a bag-of-tokens vector over the vocabulary of all
//! genre tokens in the catalog; similarity is the cosine of two vectors.
//!
//! Tokenization follows the usual word count vectorizer rules: lowercase,
//! split on anything that is not a letter, digit or underscore, and keep
//! tokens of at least two characters. So "Sci-Fi" contributes `sci` and
//! `fi`, and "Children's" contributes `children`.
//!
//! A movie without any token (no tags at all) has a zero vector. Its
//! similarity is 0 with every movie, itself included.

use crate::cosine::{pairwise_cosine, SparseVector};
use crate::matrix::SimilarityMatrix;
use data_loader::Catalog;
use std::collections::BTreeMap;
use tracing::{instrument, warn};

/// Split one genre tag into vocabulary tokens
pub fn tokenize(tag: &str) -> Vec<String> {
    tag.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

/// Build the genre similarity matrix for a catalog.
///
/// The axis follows catalog order. An empty catalog yields an empty matrix.
#[instrument(skip(catalog), fields(movies = catalog.len()))]
pub fn build_genre_similarity(catalog: &Catalog) -> SimilarityMatrix {
    let tokenized: Vec<Vec<String>> = catalog
        .movies()
        .iter()
        .map(|movie| movie.genres.iter().flat_map(|tag| tokenize(tag)).collect())
        .collect();

    // Vocabulary in sorted order keeps feature indices stable across builds
    let mut vocabulary: BTreeMap<&str, usize> = BTreeMap::new();
    for tokens in &tokenized {
        for token in tokens {
            vocabulary.insert(token.as_str(), 0);
        }
    }
    for (index, slot) in vocabulary.values_mut().enumerate() {
        *slot = index;
    }

    let vectors: Vec<SparseVector> = tokenized
        .iter()
        .map(|tokens| SparseVector::from_pairs(tokens.iter().map(|t| (vocabulary[t.as_str()], 1.0))))
        .collect();

    let ids = catalog.movies().iter().map(|movie| movie.id).collect();
    let matrix = pairwise_cosine(ids, &vectors, vocabulary.len());

    if matrix.zero_vectors() > 0 {
        warn!(
            "{} movies have no genre tokens; their genre similarity is 0",
            matrix.zero_vectors()
        );
    }
    matrix
}
