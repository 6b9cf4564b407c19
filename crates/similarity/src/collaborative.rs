//! Collaborative item-item similarity from the rating table.
//!
//! ## Algorithm
//! 1. Pivot the ratings into a users × movies matrix, missing cells = 0.0.
//!    Several ratings for the same (user, movie) pair are averaged.
//! 2. Treat each movie column (its ratings across all users) as the
//!    movie's feature vector.
//! 3. Cosine similarity between every pair of columns.
//!
//! The matrix is never materialized densely: each column is kept as a
//! sparse vector over user positions, which gives exactly the same dot
//! products as the dense pivot because the missing cells are zeros.
//!
//! The universe is the set of movie ids present in the ratings, in
//! ascending id order. Movies without ratings are absent, not zero-filled.

use crate::cosine::{pairwise_cosine, SparseVector};
use crate::error::{Result, SimilarityError};
use crate::matrix::SimilarityMatrix;
use data_loader::{MovieId, Rating, UserId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument, warn};

/// Pivot the rating table into sparse movie columns.
///
/// Returns the movie ids (ascending), one column per movie over user
/// positions (users ascending), and the number of distinct users.
fn pivot(ratings: &[Rating]) -> Result<(Vec<MovieId>, Vec<SparseVector>, usize)> {
    // (movie, user) -> (sum, count)
    let mut cells: BTreeMap<(MovieId, UserId), (f64, u32)> = BTreeMap::new();
    let mut users: BTreeSet<UserId> = BTreeSet::new();

    for rating in ratings {
        if !rating.rating.is_finite() {
            return Err(SimilarityError::InvalidRating {
                user_id: rating.user_id,
                movie_id: rating.movie_id,
                value: rating.rating,
            });
        }
        let cell = cells.entry((rating.movie_id, rating.user_id)).or_insert((0.0, 0));
        cell.0 += f64::from(rating.rating);
        cell.1 += 1;
        users.insert(rating.user_id);
    }

    let duplicates = ratings.len() - cells.len();
    if duplicates > 0 {
        debug!("Averaged {} duplicate (user, movie) ratings", duplicates);
    }

    let user_positions: BTreeMap<UserId, usize> = users
        .iter()
        .enumerate()
        .map(|(pos, &user_id)| (user_id, pos))
        .collect();

    let mut movie_ids: Vec<MovieId> = Vec::new();
    let mut columns: Vec<Vec<(usize, f64)>> = Vec::new();
    for (&(movie_id, user_id), &(sum, count)) in &cells {
        if movie_ids.last() != Some(&movie_id) {
            movie_ids.push(movie_id);
            columns.push(Vec::new());
        }
        if let Some(column) = columns.last_mut() {
            column.push((user_positions[&user_id], sum / f64::from(count)));
        }
    }

    let columns = columns.into_iter().map(SparseVector::from_pairs).collect();
    Ok((movie_ids, columns, users.len()))
}

/// Build the collaborative similarity matrix from a rating table.
///
/// The input is not modified. Fails only on a non-finite rating value.
#[instrument(skip(ratings), fields(ratings = ratings.len()))]
pub fn build_collaborative_similarity(ratings: &[Rating]) -> Result<SimilarityMatrix> {
    let (movie_ids, columns, num_users) = pivot(ratings)?;
    debug!(
        "Pivoted {} ratings into {} users × {} movies",
        ratings.len(),
        num_users,
        movie_ids.len()
    );

    let matrix = pairwise_cosine(movie_ids, &columns, num_users);

    if matrix.zero_vectors() > 0 {
        warn!(
            "{} movies have only zero ratings; their collaborative similarity is 0",
            matrix.zero_vectors()
        );
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_ratings() -> Vec<Rating> {
        vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 2, 4.0),
            Rating::new(2, 2, 5.0),
            Rating::new(2, 3, 5.0),
        ]
    }

    #[test]
    fn test_scenario_values() {
        let m = build_collaborative_similarity(&scenario_ratings()).unwrap();

        // Columns: m1 = (5, 0), m2 = (4, 5), m3 = (0, 5)
        let sqrt41 = 41f64.sqrt();
        assert!((m.get(1, 2).unwrap() - 4.0 / sqrt41).abs() < 1e-12);
        assert!((m.get(2, 3).unwrap() - 5.0 / sqrt41).abs() < 1e-12);
        assert_eq!(m.get(1, 3), Some(0.0));
        assert_eq!(m.get(2, 2), Some(1.0));
    }

    #[test]
    fn test_universe_is_rated_movies_only() {
        let ratings = vec![Rating::new(1, 30, 3.0), Rating::new(2, 10, 4.0), Rating::new(2, 30, 1.0)];
        let m = build_collaborative_similarity(&ratings).unwrap();

        assert_eq!(m.ids(), &[10, 30]);
        assert!(!m.contains(20));
    }

    #[test]
    fn test_duplicates_are_averaged() {
        let with_duplicate = vec![
            Rating::new(1, 1, 2.0),
            Rating::new(1, 1, 4.0),
            Rating::new(1, 2, 3.0),
            Rating::new(2, 2, 1.0),
        ];
        let averaged = vec![Rating::new(1, 1, 3.0), Rating::new(1, 2, 3.0), Rating::new(2, 2, 1.0)];

        assert_eq!(
            build_collaborative_similarity(&with_duplicate).unwrap(),
            build_collaborative_similarity(&averaged).unwrap()
        );
    }

    #[test]
    fn test_zero_rating_column() {
        let ratings = vec![Rating::new(1, 1, 0.0), Rating::new(1, 2, 4.0)];
        let m = build_collaborative_similarity(&ratings).unwrap();

        assert_eq!(m.get(1, 1), Some(0.0));
        assert_eq!(m.get(1, 2), Some(0.0));
        assert_eq!(m.zero_vectors(), 1);
    }

    #[test]
    fn test_non_finite_rating_rejected() {
        let ratings = vec![Rating::new(1, 1, f32::INFINITY)];
        let err = build_collaborative_similarity(&ratings).unwrap_err();
        assert_eq!(
            err,
            SimilarityError::InvalidRating {
                user_id: 1,
                movie_id: 1,
                value: f32::INFINITY
            }
        );
    }

    #[test]
    fn test_empty_ratings() {
        let m = build_collaborative_similarity(&[]).unwrap();
        assert!(m.is_empty());
    }
}
