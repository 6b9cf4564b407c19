//! Pipeline for filtering scored movie candidates.
//!
//! This crate provides:
//! - Candidate and ScoringContext, the data filters work on
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! Candidates arrive already scored and in catalog order. Each filter keeps
//! that order, so the ranking step can rely on a stable sort for ties:
//! 1. GenreIncludeFilter keeps wanted genres
//! 2. GenreExcludeFilter drops unwanted genres (wins over include)
//! 3. AlreadyFavoritedFilter drops the user's own favorites
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, ScoringContext};
//!
//! let pipeline = FilterPipeline::standard(catalog.clone());
//! let context = ScoringContext::new(favorite_ids, &profile.filters);
//! let filtered = pipeline.apply(candidates, &context)?;
//! ```

pub mod candidate;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use candidate::{Candidate, GenrePatterns, ScoringContext};
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
