//! Error types for the similarity crate.

use data_loader::{MovieId, UserId};
use thiserror::Error;

/// Errors raised while building a similarity matrix.
///
/// Zero-norm vectors are not errors: they produce similarity 0 and are
/// counted on the resulting matrix.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    /// A rating value that cannot take part in a cosine computation
    #[error("Invalid rating {value} for user {user_id}, movie {movie_id}")]
    InvalidRating {
        user_id: UserId,
        movie_id: MovieId,
        value: f32,
    },
}

pub type Result<T> = std::result::Result<T, SimilarityError>;
