//! Filter implementations for the candidate pipeline.
//!
//! The recommender applies them in this order: genre include, genre
//! exclude, already favorited. Exclude runs after include, so a movie that
//! matches both is dropped.

pub mod already_favorited;
pub mod genre_exclude;
pub mod genre_include;

// Re-export for convenience
pub use already_favorited::AlreadyFavoritedFilter;
pub use genre_exclude::GenreExcludeFilter;
pub use genre_include::GenreIncludeFilter;
