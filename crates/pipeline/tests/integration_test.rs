//! Integration tests for the pipeline.
//!
//! These tests verify that the genre and favorites filters work together
//! in the order the recommender uses them.

use data_loader::{Catalog, GenreFilters, Movie};
use pipeline::{Candidate, FilterPipeline, ScoringContext};
use std::collections::HashSet;
use std::sync::Arc;

fn create_test_setup() -> (Arc<Catalog>, Vec<Candidate>) {
    let catalog = Catalog::new(vec![
        Movie::new(1, "A", &["Comedy"]),
        Movie::new(2, "B", &["Comedy", "Horror"]),
        Movie::new(3, "C", &["Drama"]),
        Movie::new(4, "D", &["Romantic Comedy"]),
        Movie::new(5, "E", &["Horror"]),
    ])
    .unwrap();

    let candidates = catalog
        .movies()
        .iter()
        .enumerate()
        .map(|(pos, movie)| Candidate::new(movie.id, 1.0 / (pos as f64 + 1.0), pos))
        .collect();

    (Arc::new(catalog), candidates)
}

fn ids(candidates: &[Candidate]) -> Vec<u32> {
    candidates.iter().map(|c| c.movie_id).collect()
}

#[test]
fn test_exclude_wins_over_include() {
    let (catalog, candidates) = create_test_setup();
    let context = ScoringContext::new(HashSet::new(), &GenreFilters::new(&["comedy"], &["horror"]));

    let filtered = FilterPipeline::standard(catalog).apply(candidates, &context).unwrap();

    // B matches both and is dropped; D matches "comedy" as a substring
    assert_eq!(ids(&filtered), vec![1, 4]);
}

#[test]
fn test_favorites_removed_after_genre_filters() {
    let (catalog, candidates) = create_test_setup();
    let favorites: HashSet<u32> = [1, 3].into_iter().collect();
    let context = ScoringContext::new(favorites, &GenreFilters::default());

    let filtered = FilterPipeline::standard(catalog).apply(candidates, &context).unwrap();

    assert_eq!(ids(&filtered), vec![2, 4, 5]);
}

#[test]
fn test_filters_keep_catalog_order() {
    let (catalog, candidates) = create_test_setup();
    let context = ScoringContext::new(HashSet::new(), &GenreFilters::new(&[], &["drama"]));

    let filtered = FilterPipeline::standard(catalog).apply(candidates, &context).unwrap();

    let positions: Vec<usize> = filtered.iter().map(|c| c.catalog_position).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn test_everything_filtered_is_empty_not_error() {
    let (catalog, candidates) = create_test_setup();
    let context = ScoringContext::new(HashSet::new(), &GenreFilters::new(&["western"], &[]));

    let filtered = FilterPipeline::standard(catalog).apply(candidates, &context).unwrap();
    assert!(filtered.is_empty());
}
