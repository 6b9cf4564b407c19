//! # Similarity Crate
//!
//! Builds the two movie×movie similarity signals the recommender works with.
//!
//! ## Components
//!
//! ### Genre similarity (content-based)
//! Bag-of-tokens vectors over genre tags, cosine similarity between movies.
//! Built once per catalog.
//!
//! ### Collaborative similarity (item-item)
//! Cosine similarity between movie columns of the user × movie rating
//! matrix. Rebuilt from scratch whenever the rating table changes.
//!
//! ### RetrainCoordinator
//! Appends new ratings to the base table, rebuilds the collaborative matrix
//! and swaps it in atomically for readers.
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{build_genre_similarity, RetrainCoordinator};
//!
//! let genre = build_genre_similarity(&catalog);
//! let coordinator = RetrainCoordinator::new(ratings)?;
//!
//! let snapshot = coordinator.current();
//! println!("{:?}", snapshot.get(1, 2));
//!
//! coordinator.retrain(&new_ratings)?;
//! ```

// Public modules
pub mod error;
pub mod matrix;
pub mod cosine;
pub mod genre;
pub mod collaborative;
pub mod retrain;

// Re-export commonly used types
pub use collaborative::build_collaborative_similarity;
pub use error::{Result, SimilarityError};
pub use genre::build_genre_similarity;
pub use matrix::SimilarityMatrix;
pub use retrain::{retrain, RetrainCoordinator};
