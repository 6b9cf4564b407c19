//! Catalog construction and dataset loading.
//!
//! - Build the Catalog indices (id -> position, lowercased title -> position)
//! - Load movies.csv and ratings.csv in parallel
//! - Validate the rating table before it reaches the similarity builders

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Highest score the MovieLens exports use
pub const MAX_RATING: f32 = 5.0;

impl Catalog {
    /// Build a catalog from movies in their original order.
    ///
    /// Fails on a repeated movie id. Repeated titles are allowed; lookups
    /// by title return the first one.
    pub fn new(movies: Vec<Movie>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(movies.len());
        let mut titles = HashMap::with_capacity(movies.len());

        for (pos, movie) in movies.iter().enumerate() {
            if positions.insert(movie.id, pos).is_some() {
                return Err(DataLoadError::DuplicateMovie { id: movie.id });
            }
            titles.entry(movie.title.to_lowercase()).or_insert(pos);
        }

        Ok(Self {
            movies,
            positions,
            titles,
        })
    }
}

/// Check that every rating value is finite and in 0.0..=5.0.
///
/// Ratings for movies missing from the catalog are accepted: the
/// collaborative index is built from the rating table alone.
pub fn validate_ratings(ratings: &[Rating]) -> Result<()> {
    for rating in ratings {
        if !rating.rating.is_finite() || rating.rating < 0.0 || rating.rating > MAX_RATING {
            return Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: format!(
                    "{} (user {}, movie {})",
                    rating.rating, rating.user_id, rating.movie_id
                ),
            });
        }
    }
    Ok(())
}

/// Load a MovieLens export directory.
///
/// Steps:
/// 1. Parse movies.csv and ratings.csv in parallel
/// 2. Build the catalog
/// 3. Validate the ratings
pub fn load_dataset(data_dir: &Path) -> Result<(Catalog, Vec<Rating>)> {
    let movies_path = data_dir.join("movies.csv");
    let ratings_path = data_dir.join("ratings.csv");

    info!("Loading MovieLens dataset from {:?}", data_dir);

    let (movies, ratings) = rayon::join(
        || parser::parse_movies(&movies_path),
        || parser::parse_ratings(&ratings_path),
    );
    let movies = movies?;
    let ratings = ratings?;

    let catalog = Catalog::new(movies)?;
    validate_ratings(&ratings)?;

    info!(
        "Loaded {} movies and {} ratings",
        catalog.len(),
        ratings.len()
    );
    Ok((catalog, ratings))
}
