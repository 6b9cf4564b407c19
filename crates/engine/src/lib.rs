//! Recommendation engine for the movie recommender.
//!
//! This crate combines the catalog, the collaborative similarity matrix and
//! the filter pipeline into a single `recommend` call.

pub mod recommender;
pub mod source;

pub use recommender::{
    Recommendation, RecommendationEngine, RecommendationStatus, Recommendations, DEFAULT_TOP_N,
};
pub use source::SimilaritySource;
