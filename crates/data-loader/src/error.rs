//! Error types for the data-loader crate.
//!
//! Parsing failures carry the file and line they came from so a broken
//! dataset can be fixed by hand. Structural problems found after parsing
//! (duplicate ids, out-of-range ratings) are reported as validation errors.

use thiserror::Error;

/// Errors that can occur while loading the catalog and rating table
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A CSV row couldn't be decoded into a record
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The same movie id appears twice in the catalog
    #[error("Duplicate movie id {id} in catalog")]
    DuplicateMovie { id: u32 },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
