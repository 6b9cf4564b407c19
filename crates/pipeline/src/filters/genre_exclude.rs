//! Filter to drop movies in genres the user doesn't want.

use crate::candidate::{Candidate, ScoringContext};
use crate::traits::Filter;
use anyhow::Result;
use data_loader::Catalog;
use std::sync::Arc;

/// Removes candidates whose genre text contains any exclude pattern.
///
/// Uses the same case-insensitive substring match as GenreIncludeFilter.
/// Movies missing from the catalog are dropped when exclude patterns are set.
pub struct GenreExcludeFilter {
    catalog: Arc<Catalog>,
}

impl GenreExcludeFilter {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl Filter for GenreExcludeFilter {
    fn name(&self) -> &str {
        "GenreExcludeFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &ScoringContext,
    ) -> Result<Vec<Candidate>> {
        if context.exclude.is_empty() {
            return Ok(candidates);
        }
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| {
                self.catalog
                    .get(candidate.movie_id)
                    .is_some_and(|movie| !context.exclude.matches(&movie.genre_text()))
            })
            .collect();
        Ok(filtered)
    }
}
