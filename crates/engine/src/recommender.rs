//! # Recommendation Engine
//!
//! This module turns a user profile into a ranked list of movies:
//! 1. Resolve favorite titles to catalog ids
//! 2. Sum the collaborative similarity rows of the favorites
//! 3. Apply the genre and favorites filters
//! 4. Rank by score (stable, so ties keep catalog order)
//! 5. Return the top N
//!
//! Conditions the user should hear about (no favorites, unknown titles,
//! nothing left after filtering) come back inside `Recommendations`, not
//! as errors.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use data_loader::{Catalog, GenreFilters, MovieId, UserProfile};
use pipeline::{Candidate, FilterPipeline, ScoringContext};
use similarity::SimilarityMatrix;

use crate::source::SimilaritySource;

/// Number of recommendations returned when the caller doesn't say
pub const DEFAULT_TOP_N: usize = 5;

/// One recommended movie
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    /// Summed similarity to the favorites
    pub score: f64,
}

/// How a request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationStatus {
    /// At least one recommendation was produced
    Ranked,
    /// The profile lists no favorites; the caller should ask for some
    NoFavorites,
    /// Favorites didn't resolve, or the filters left nothing
    NoCandidates,
}

/// Result of one recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    /// Best first, at most the requested count
    pub items: Vec<Recommendation>,
    /// Favorite titles with no exact (case-insensitive) catalog match
    pub unresolved_favorites: Vec<String>,
    pub status: RecommendationStatus,
}

impl Recommendations {
    fn empty(status: RecommendationStatus, unresolved_favorites: Vec<String>) -> Self {
        Self {
            items: Vec::new(),
            unresolved_favorites,
            status,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Recommended titles, best first
    pub fn titles(&self) -> Vec<String> {
        self.items.iter().map(|r| r.title.clone()).collect()
    }
}

/// Scores and filters movies for one profile at a time
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    similarity: Arc<dyn SimilaritySource>,
    filter_pipeline: Arc<FilterPipeline>,
    default_limit: usize,
}

impl RecommendationEngine {
    /// Create an engine over a catalog and a collaborative matrix provider
    ///
    /// # Arguments
    /// * `catalog` - Shared catalog used for title resolution and output
    /// * `similarity` - Provider of the active collaborative matrix
    pub fn new(catalog: Arc<Catalog>, similarity: Arc<dyn SimilaritySource>) -> Self {
        let filter_pipeline = Arc::new(FilterPipeline::standard(Arc::clone(&catalog)));
        Self {
            catalog,
            similarity,
            filter_pipeline,
            default_limit: DEFAULT_TOP_N,
        }
    }

    /// Configure how many results `recommend_for_profile` returns (default: 5)
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Recommend using the profile's own genre filters and the default limit
    pub fn recommend_for_profile(&self, profile: &UserProfile) -> Result<Recommendations> {
        self.recommend(profile, &profile.filters, self.default_limit)
    }

    /// Main entry point: recommend up to `top_n` movies for a profile
    ///
    /// # Arguments
    /// * `profile` - Only `favorites` is read
    /// * `filters` - Include / exclude genre patterns for this request
    /// * `top_n` - Maximum number of results; fewer are returned if fewer remain
    pub fn recommend(
        &self,
        profile: &UserProfile,
        filters: &GenreFilters,
        top_n: usize,
    ) -> Result<Recommendations> {
        let start_time = Instant::now();

        if profile.favorites.is_empty() {
            warn!("User {} has no favorites; add liked films first", profile.user_id);
            return Ok(Recommendations::empty(RecommendationStatus::NoFavorites, Vec::new()));
        }

        let (favorite_ids, unresolved) = self.resolve_favorites(&profile.favorites);

        // One snapshot for the whole request
        let similarity = self.similarity.snapshot();

        let scoring_ids: Vec<MovieId> = favorite_ids
            .iter()
            .copied()
            .filter(|&id| similarity.contains(id))
            .collect();
        if scoring_ids.is_empty() {
            info!(
                "No favorite of user {} is in the collaborative index",
                profile.user_id
            );
            return Ok(Recommendations::empty(RecommendationStatus::NoCandidates, unresolved));
        }

        let candidates = self.score_candidates(&similarity, &scoring_ids);
        debug!("Scored {} candidates", candidates.len());

        let context = ScoringContext::new(favorite_ids.into_iter().collect::<HashSet<_>>(), filters);
        let filtered = self.apply_filters(candidates, &context)?;

        let items = self.rank_and_select(filtered, top_n);
        let status = if items.is_empty() {
            RecommendationStatus::NoCandidates
        } else {
            RecommendationStatus::Ranked
        };

        info!(
            "Recommended {} movies for user {} in {:.2?}",
            items.len(),
            profile.user_id,
            start_time.elapsed()
        );
        Ok(Recommendations {
            items,
            unresolved_favorites: unresolved,
            status,
        })
    }

    /// Resolve favorite titles to catalog ids.
    ///
    /// Returns the ids in favorites order without repeats, plus the titles
    /// that matched nothing.
    fn resolve_favorites(&self, favorites: &[String]) -> (Vec<MovieId>, Vec<String>) {
        let mut ids = Vec::new();
        let mut unresolved = Vec::new();

        for title in favorites {
            match self.catalog.find_by_title(title) {
                Some(movie) => {
                    if !ids.contains(&movie.id) {
                        ids.push(movie.id);
                    }
                }
                None => {
                    warn!("Favorite '{}' not found in catalog, skipping", title);
                    unresolved.push(title.clone());
                }
            }
        }
        (ids, unresolved)
    }

    /// Sum the similarity rows of the favorites and turn every catalog movie
    /// in the collaborative universe into a candidate, in catalog order.
    fn score_candidates(&self, similarity: &SimilarityMatrix, favorite_ids: &[MovieId]) -> Vec<Candidate> {
        let mut scores = vec![0.0_f64; similarity.len()];
        for &id in favorite_ids {
            similarity.accumulate_row(id, &mut scores);
        }

        self.catalog
            .movies()
            .iter()
            .enumerate()
            .filter_map(|(pos, movie)| {
                let i = similarity.position(movie.id)?;
                Some(Candidate::new(movie.id, scores[i], pos))
            })
            .collect()
    }

    /// Apply the filter pipeline to candidates
    fn apply_filters(
        &self,
        candidates: Vec<Candidate>,
        context: &ScoringContext,
    ) -> Result<Vec<Candidate>> {
        let filtered = self
            .filter_pipeline
            .apply(candidates, context)
            .context("Failed to apply filters")?;
        debug!("Filtering complete, {} candidates remain", filtered.len());
        Ok(filtered)
    }

    /// Rank candidates by score and select top N
    fn rank_and_select(&self, mut candidates: Vec<Candidate>, limit: usize) -> Vec<Recommendation> {
        // Stable sort: equal scores stay in catalog order
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(limit);

        candidates
            .into_iter()
            .filter_map(|candidate| {
                let movie = self.catalog.movies().get(candidate.catalog_position)?;
                Some(Recommendation {
                    movie_id: movie.id,
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    score: candidate.score,
                })
            })
            .collect()
    }
}
