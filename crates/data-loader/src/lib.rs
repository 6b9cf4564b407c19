//! # Data Loader Crate
//!
//! Loads the MovieLens CSV exports and holds the domain types every other
//! crate speaks in.
//!
//! ## Main Components
//!
//! - **types**: Movie, Rating, Catalog, UserProfile
//! - **parser**: Parse movies.csv / ratings.csv into Rust structs
//! - **catalog**: Build the Catalog indices, validate and load a dataset
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::load_dataset;
//! use std::path::Path;
//!
//! let (catalog, ratings) = load_dataset(Path::new("data/ml-latest-small"))?;
//! let movie = catalog.find_by_title("toy story (1995)").unwrap();
//! println!("{} has genres {:?}", movie.title, movie.genres);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod catalog;

// Re-export commonly used types for convenience
pub use catalog::{load_dataset, validate_ratings, MAX_RATING};
pub use error::{DataLoadError, Result};
pub use parser::{parse_movies, parse_ratings};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    Rating,
    Catalog,
    // Profile types
    GenreFilters,
    HistoryEntry,
    UserProfile,
};
