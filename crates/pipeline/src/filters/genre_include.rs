//! Filter to keep only movies matching the user's wanted genres.

use crate::candidate::{Candidate, ScoringContext};
use crate::traits::Filter;
use anyhow::Result;
use data_loader::Catalog;
use std::sync::Arc;

/// Keeps candidates whose genre text contains any include pattern.
///
/// ## Algorithm
/// 1. No include patterns: keep everything
/// 2. Otherwise look the movie up in the catalog and match its
///    space-joined genres, case-insensitive substring
/// 3. Movies missing from the catalog are dropped
pub struct GenreIncludeFilter {
    catalog: Arc<Catalog>,
}

impl GenreIncludeFilter {
    /// Create a new GenreIncludeFilter.
    ///
    /// # Arguments
    /// * `catalog` - Shared reference to the catalog for genre lookups
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl Filter for GenreIncludeFilter {
    fn name(&self) -> &str {
        "GenreIncludeFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &ScoringContext,
    ) -> Result<Vec<Candidate>> {
        if context.include.is_empty() {
            return Ok(candidates);
        }
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| {
                self.catalog
                    .get(candidate.movie_id)
                    .is_some_and(|movie| context.include.matches(&movie.genre_text()))
            })
            .collect();
        Ok(filtered)
    }
}
