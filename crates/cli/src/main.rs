mod profile;
mod session;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{load_dataset, Catalog, GenreFilters, HistoryEntry, Rating, UserId, UserProfile, MAX_RATING};
use engine::{RecommendationEngine, RecommendationStatus, Recommendations, SimilaritySource};
use profile::ProfileStore;
use session::{timestamp_now, SessionExport};
use similarity::{build_collaborative_similarity, build_genre_similarity, RetrainCoordinator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// MovieRecs - hybrid movie recommender
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie recommendations from your favorites, rating similarity and genre filters", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory (movies.csv, ratings.csv)
    #[arg(short, long, default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    /// Directory holding saved profiles and exports
    #[arg(short, long, default_value = "profiles")]
    profile_dir: PathBuf,

    /// Your user ID
    #[arg(short, long)]
    user_id: UserId,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a movie (0-5)
    Rate {
        /// Exact movie title, case-insensitive
        #[arg(long)]
        title: String,

        #[arg(long)]
        score: f32,
    },

    /// Add a liked movie to your favorites
    Favorite {
        #[arg(long)]
        title: String,
    },

    /// Set genre filters (comma-separated, substring match)
    Genres {
        #[arg(long, default_value = "")]
        include: String,

        #[arg(long, default_value = "")]
        exclude: String,
    },

    /// Get movie recommendations
    Recommend {
        /// Number of recommendations to return
        #[arg(long, default_value_t = engine::DEFAULT_TOP_N)]
        limit: usize,

        /// Fold your own ratings into the collaborative index first
        #[arg(long)]
        with_my_ratings: bool,
    },

    /// Export favorites, filters and fresh recommendations to a file
    Export {
        /// File name inside the profile directory
        #[arg(long)]
        file: String,
    },

    /// Movies with the most similar genres to a title
    Similar {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show your saved profile
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = ProfileStore::new(&cli.profile_dir);
    let mut profile = store.load(cli.user_id)?;

    // Dispatch to appropriate command handler; true means the profile changed
    let changed = match cli.command {
        Commands::Rate { title, score } => handle_rate(&cli.data_dir, &mut profile, &title, score).await?,
        Commands::Favorite { title } => handle_favorite(&mut profile, title),
        Commands::Genres { include, exclude } => handle_genres(&mut profile, &include, &exclude),
        Commands::Recommend {
            limit,
            with_my_ratings,
        } => handle_recommend(&cli.data_dir, &mut profile, limit, with_my_ratings).await?,
        Commands::Export { file } => handle_export(&cli.data_dir, &store, &profile, &file).await?,
        Commands::Similar { title, limit } => handle_similar(&cli.data_dir, &title, limit).await?,
        Commands::Show => {
            print_profile(&profile);
            false
        }
    };

    if changed {
        let path = store.save(&profile)?;
        println!("{} Profile saved to {}", "✓".green(), path.display());
    }

    Ok(())
}

/// Load the dataset on the blocking pool
async fn load_data(data_dir: &Path) -> Result<(Catalog, Vec<Rating>)> {
    println!("Loading MovieLens dataset from {}...", data_dir.display());
    let start = Instant::now();

    let dir = data_dir.to_path_buf();
    let (catalog, ratings) = tokio::task::spawn_blocking(move || load_dataset(&dir))
        .await?
        .context("Failed to load MovieLens dataset")?;

    println!(
        "{} Loaded {} movies and {} ratings in {:?}",
        "✓".green(),
        catalog.len(),
        ratings.len(),
        start.elapsed()
    );
    Ok((catalog, ratings))
}

/// Load the dataset and build the engine, retraining with the profile's own
/// ratings when asked to
async fn build_engine(
    data_dir: &Path,
    profile: &UserProfile,
    with_my_ratings: bool,
) -> Result<RecommendationEngine> {
    let (catalog, ratings) = load_data(data_dir).await?;
    let own_ratings = profile.ratings_as_table();

    let start = Instant::now();
    let source: Arc<dyn SimilaritySource> = tokio::task::spawn_blocking(move || {
        let source: Arc<dyn SimilaritySource> = if with_my_ratings && !own_ratings.is_empty() {
            let coordinator = RetrainCoordinator::new(ratings)?;
            coordinator.retrain(&own_ratings)?;
            Arc::new(coordinator)
        } else {
            Arc::new(Arc::new(build_collaborative_similarity(&ratings)?))
        };
        Ok::<_, anyhow::Error>(source)
    })
    .await?
    .context("Failed to build the collaborative similarity index")?;
    println!("{} Built similarity index in {:?}", "✓".green(), start.elapsed());

    Ok(RecommendationEngine::new(Arc::new(catalog), source))
}

/// Handle the 'rate' command
async fn handle_rate(data_dir: &Path, profile: &mut UserProfile, title: &str, score: f32) -> Result<bool> {
    if !score.is_finite() || !(0.0..=MAX_RATING).contains(&score) {
        bail!("Score must be between 0 and {}, got {}", MAX_RATING, score);
    }

    let (catalog, _) = load_data(data_dir).await?;
    match catalog.find_by_title(title) {
        Some(movie) => {
            profile.ratings.insert(movie.id, score);
            println!("{} Scored {} with {}", "✓".green(), movie.title.bold(), score);
            Ok(true)
        }
        None => {
            println!("{} Film '{}' is not in the catalog", "✗".red(), title);
            Ok(false)
        }
    }
}

/// Handle the 'favorite' command
fn handle_favorite(profile: &mut UserProfile, title: String) -> bool {
    println!("{} Added '{}' to favorites", "✓".green(), title);
    profile.favorites.push(title);
    true
}

/// Handle the 'genres' command
fn handle_genres(profile: &mut UserProfile, include: &str, exclude: &str) -> bool {
    profile.filters = GenreFilters {
        include: parse_list(include),
        exclude: parse_list(exclude),
    };
    println!(
        "{} Include: [{}]  Exclude: [{}]",
        "✓".green(),
        profile.filters.include.join(", "),
        profile.filters.exclude.join(", ")
    );
    true
}

/// Handle the 'recommend' command
async fn handle_recommend(
    data_dir: &Path,
    profile: &mut UserProfile,
    limit: usize,
    with_my_ratings: bool,
) -> Result<bool> {
    let engine = build_engine(data_dir, profile, with_my_ratings).await?;
    let recommendations = engine.recommend(profile, &profile.filters, limit)?;

    print_recommendations(&recommendations);

    if recommendations.is_empty() {
        return Ok(false);
    }

    profile.history.push(HistoryEntry {
        time: timestamp_now(),
        input: profile.favorites.clone(),
        filters: profile.filters.clone(),
        results: recommendations.titles(),
    });
    Ok(true)
}

/// Handle the 'export' command
async fn handle_export(data_dir: &Path, store: &ProfileStore, profile: &UserProfile, file: &str) -> Result<bool> {
    let engine = build_engine(data_dir, profile, false).await?;
    let recommendations = engine.recommend_for_profile(profile)?;

    if recommendations.is_empty() {
        print_recommendations(&recommendations);
        println!("No recommendations to export.");
        return Ok(false);
    }

    let path = SessionExport::new(profile, recommendations.titles()).write(store.dir(), file)?;
    println!("{} Exported session to {}", "✓".green(), path.display());
    Ok(false)
}

/// Handle the 'similar' command
async fn handle_similar(data_dir: &Path, title: &str, limit: usize) -> Result<bool> {
    let (catalog, _) = load_data(data_dir).await?;
    let Some(movie) = catalog.find_by_title(title).cloned() else {
        println!("{} Film '{}' is not in the catalog", "✗".red(), title);
        return Ok(false);
    };

    let catalog = Arc::new(catalog);
    let index_catalog = Arc::clone(&catalog);
    let genre_index = tokio::task::spawn_blocking(move || build_genre_similarity(&index_catalog)).await?;

    println!(
        "{}",
        format!("Movies with genres like {}:", movie.title).bold().blue()
    );
    for (rank, (movie_id, similarity)) in genre_index.most_similar(movie.id, limit).into_iter().enumerate() {
        if let Some(other) = catalog.get(movie_id) {
            println!(
                "{}. {} [{}] - Similarity: {:.2}",
                (rank + 1).to_string().green(),
                other.title,
                other.genres.join(", "),
                similarity
            );
        }
    }
    Ok(false)
}

/// Split a comma-separated list, trimming entries and dropping blanks
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &Recommendations) {
    for title in &recommendations.unresolved_favorites {
        println!("{} Favorite '{}' not found in catalog", "!".yellow(), title);
    }

    match recommendations.status {
        RecommendationStatus::NoFavorites => {
            println!("{}", "Add your liked films for recommendation.".yellow());
            return;
        }
        RecommendationStatus::NoCandidates => {
            println!("{}", "No movies match your favorites and filters.".yellow());
            return;
        }
        RecommendationStatus::Ranked => {}
    }

    println!("{}", "Movie Recommendations:".bold().blue());
    for (rank, rec) in recommendations.items.iter().enumerate() {
        println!(
            "{}. {} [{}] - Score: {:.2}",
            (rank + 1).to_string().green(),
            rec.title,
            rec.genres.join(", "),
            rec.score
        );
    }
}

/// Handle the 'show' command
fn print_profile(profile: &UserProfile) {
    println!("{}", format!("User ID: {}", profile.user_id).bold().blue());

    println!("{}Favorites ({}):", "• ".green(), profile.favorites.len());
    for title in &profile.favorites {
        println!("  - {}", title);
    }

    println!("{}Include genres: [{}]", "• ".green(), profile.filters.include.join(", "));
    println!("{}Exclude genres: [{}]", "• ".green(), profile.filters.exclude.join(", "));

    println!("{}Ratings ({}):", "• ".cyan(), profile.ratings.len());
    for (movie_id, score) in &profile.ratings {
        println!("  - movie {}: {}", movie_id, score);
    }

    println!("{}Past requests: {}", "• ".cyan(), profile.history.len());
    if let Some(last) = profile.history.last() {
        println!("  last at {}: {}", last.time, last.results.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_drops_blanks() {
        assert_eq!(parse_list(" Comedy, ,Drama ,"), vec!["Comedy", "Drama"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_handle_genres_replaces_filters() {
        let mut profile = UserProfile::new(1);
        profile.filters = GenreFilters::new(&["Western"], &[]);

        assert!(handle_genres(&mut profile, "Comedy", "Horror, Thriller"));
        assert_eq!(profile.filters, GenreFilters::new(&["Comedy"], &["Horror", "Thriller"]));
    }

    #[test]
    fn test_handle_favorite_appends() {
        let mut profile = UserProfile::new(1);
        handle_favorite(&mut profile, "Heat (1995)".to_string());
        handle_favorite(&mut profile, "Up (2009)".to_string());
        assert_eq!(profile.favorites, vec!["Heat (1995)", "Up (2009)"]);
    }

    #[test]
    fn test_cli_parses_recommend() {
        let cli = Cli::try_parse_from(["movie-recs", "--user-id", "4", "recommend", "--limit", "3"]).unwrap();
        assert_eq!(cli.user_id, 4);
        assert!(matches!(
            cli.command,
            Commands::Recommend { limit: 3, with_my_ratings: false }
        ));
    }
}
