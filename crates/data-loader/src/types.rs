//! Core domain types shared by every crate in the workspace.
//!
//! - Type aliases for domain clarity (UserId, MovieId)
//! - Movie and Rating records as they come out of the CSV files
//! - Catalog, the ordered and indexed movie list
//! - UserProfile, the per-user state persisted by the command-line front end

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user in the rating table
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Movie
// =============================================================================

/// Represents a movie in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre tags in the order the catalog lists them
    pub genres: Vec<String>,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>, genres: &[&str]) -> Self {
        Self {
            id,
            title: title.into(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    /// Genre tags joined by single spaces.
    ///
    /// This is the text that genre filters search in, so a pattern can match
    /// across a tag boundary just like it would in the raw pipe-joined column.
    pub fn genre_text(&self) -> String {
        self.genres.join(" ")
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value, 0.0 to 5.0 in the MovieLens exports
    pub rating: f32,
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f32) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The movie catalog: movies in their original order plus lookup indices.
///
/// Order matters. Ranking ties are broken by catalog position and favorite
/// titles resolve to the first movie with that title.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
    /// MovieId -> position in `movies`
    pub(crate) positions: HashMap<MovieId, usize>,
    /// Lowercased title -> position of the first movie carrying it
    pub(crate) titles: HashMap<String, usize>,
}

impl Catalog {
    /// All movies in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Get a movie by ID
    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.positions.get(&id).map(|&pos| &self.movies[pos])
    }

    /// Position of a movie in catalog order
    pub fn position(&self, id: MovieId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Case-insensitive exact title lookup. No fuzzy matching.
    pub fn find_by_title(&self, title: &str) -> Option<&Movie> {
        self.titles
            .get(&title.to_lowercase())
            .map(|&pos| &self.movies[pos])
    }
}

// =============================================================================
// User profile
// =============================================================================

/// Include/exclude genre patterns declared by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenreFilters {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl GenreFilters {
    pub fn new(include: &[&str], exclude: &[&str]) -> Self {
        Self {
            include: include.iter().map(|g| g.to_string()).collect(),
            exclude: exclude.iter().map(|g| g.to_string()).collect(),
        }
    }
}

/// One past recommendation request, kept for the user's own record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// RFC 3339 timestamp
    pub time: String,
    /// Favorites at the time of the request
    pub input: Vec<String>,
    pub filters: GenreFilters,
    /// Recommended titles, best first
    pub results: Vec<String>,
}

/// Everything the application remembers about one user.
///
/// The recommender only reads `favorites` and `filters`; `ratings` and
/// `history` are maintained by the front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    /// Liked titles as the user typed them
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub filters: GenreFilters,
    /// Personal scores keyed by movie id
    #[serde(default)]
    pub ratings: BTreeMap<MovieId, f32>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl UserProfile {
    /// Creates an empty profile for a user
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// The profile's own scores as rating-table rows
    pub fn ratings_as_table(&self) -> Vec<Rating> {
        self.ratings
            .iter()
            .map(|(&movie_id, &rating)| Rating::new(self.user_id, movie_id, rating))
            .collect()
    }
}
