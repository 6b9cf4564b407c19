//! Filter to remove movies the user already listed as favorites.
//!
//! There is no point recommending what the user told us they like.

use crate::candidate::{Candidate, ScoringContext};
use crate::traits::Filter;
use anyhow::Result;

/// Removes candidates whose id is one of the resolved favorites.
///
/// ## Algorithm
/// Uses the HashSet in ScoringContext.favorite_ids for O(1) lookups.
pub struct AlreadyFavoritedFilter;

impl Filter for AlreadyFavoritedFilter {
    fn name(&self) -> &str {
        "AlreadyFavoritedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &ScoringContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| !context.favorite_ids.contains(&candidate.movie_id))
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_favorited_filter() {
        let mut context = ScoringContext::default();
        context.favorite_ids.insert(100);
        context.favorite_ids.insert(200);

        let candidates = vec![
            Candidate::new(100, 0.9, 0),
            Candidate::new(101, 0.8, 1),
            Candidate::new(200, 0.7, 2),
            Candidate::new(300, 0.6, 3),
        ];

        let filtered = AlreadyFavoritedFilter.apply(candidates, &context).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].movie_id, 101);
        assert_eq!(filtered[1].movie_id, 300);
    }
}
