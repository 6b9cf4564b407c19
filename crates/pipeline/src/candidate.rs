//! Candidates and the per-request context filters read from.

use data_loader::{GenreFilters, MovieId};
use std::collections::HashSet;

/// A movie under consideration, with its aggregated similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub movie_id: MovieId,
    /// Sum of similarities to the user's favorites
    pub score: f64,
    /// Position in the catalog, the tie-breaker for equal scores
    pub catalog_position: usize,
}

impl Candidate {
    pub fn new(movie_id: MovieId, score: f64, catalog_position: usize) -> Self {
        Self {
            movie_id,
            score,
            catalog_position,
        }
    }
}

/// Lowercased, non-blank genre patterns ready for substring matching
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenrePatterns {
    patterns: Vec<String>,
}

impl GenrePatterns {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Case-insensitive "contains any of" over a genre text.
    ///
    /// This is plain substring matching: "Comedy" also hits "Romantic Comedy",
    /// and "Fi" hits "Sci-Fi".
    pub fn matches(&self, genre_text: &str) -> bool {
        let text = genre_text.to_lowercase();
        self.patterns.iter().any(|p| text.contains(p.as_str()))
    }
}

/// What the filters know about the request
#[derive(Debug, Clone, Default)]
pub struct ScoringContext {
    /// Favorites resolved to catalog ids
    pub favorite_ids: HashSet<MovieId>,
    pub include: GenrePatterns,
    pub exclude: GenrePatterns,
}

impl ScoringContext {
    pub fn new(favorite_ids: HashSet<MovieId>, filters: &GenreFilters) -> Self {
        Self {
            favorite_ids,
            include: GenrePatterns::new(&filters.include),
            exclude: GenrePatterns::new(&filters.exclude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_are_case_insensitive_substrings() {
        let patterns = GenrePatterns::new(&["comedy", "  "]);

        assert!(!patterns.is_empty());
        assert!(patterns.matches("Romantic Comedy"));
        assert!(patterns.matches("COMEDY Horror"));
        assert!(!patterns.matches("Drama"));
    }

    #[test]
    fn test_blank_patterns_are_dropped() {
        let patterns = GenrePatterns::new(&["", " "]);
        assert!(patterns.is_empty());
        assert!(!patterns.matches("Drama"));
    }

    #[test]
    fn test_context_from_filters() {
        let filters = GenreFilters::new(&["Comedy"], &["Horror"]);
        let context = ScoringContext::new([1].into_iter().collect(), &filters);

        assert!(context.favorite_ids.contains(&1));
        assert!(context.include.matches("comedy"));
        assert!(context.exclude.matches("horror"));
    }
}
