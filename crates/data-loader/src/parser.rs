//! Parser for the MovieLens CSV exports.
//!
//! - movies.csv:  movieId,title,genres   (genres are pipe-separated)
//! - ratings.csv: userId,movieId,rating,timestamp
//!
//! Titles are quoted when they contain commas ("American President, The (1995)"),
//! so the files go through the `csv` crate rather than a plain split.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Raw row of movies.csv
#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    genres: String,
}

/// Raw row of ratings.csv. The timestamp column is present in the export
/// but nothing downstream uses it.
#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Turn a csv error into a ParseError with the line it happened on
fn parse_error(file: &str, err: csv::Error) -> DataLoadError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    match err.into_kind() {
        csv::ErrorKind::Io(io) => DataLoadError::IoError(io),
        kind => DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason: format!("{:?}", kind),
        },
    }
}

/// Parse pipe-separated genres
///
/// Example: "Action|Adventure|Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse movies from any reader holding movies.csv content
pub fn read_movies<R: Read>(reader: R, file: &str) -> Result<Vec<Movie>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut movies = Vec::new();

    for row in csv_reader.deserialize::<MovieRow>() {
        let row = row.map_err(|e| parse_error(file, e))?;
        movies.push(Movie {
            id: row.movie_id,
            title: row.title,
            genres: parse_genres(&row.genres),
        });
    }
    Ok(movies)
}

/// Parse ratings from any reader holding ratings.csv content
pub fn read_ratings<R: Read>(reader: R, file: &str) -> Result<Vec<Rating>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut ratings = Vec::new();

    for row in csv_reader.deserialize::<RatingRow>() {
        let row = row.map_err(|e| parse_error(file, e))?;
        ratings.push(Rating::new(row.user_id, row.movie_id, row.rating));
    }
    Ok(ratings)
}

/// Parse the movies.csv file
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    read_movies(open(path)?, &file_name(path))
}

/// Parse the ratings.csv file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    read_ratings(open(path)?, &file_name(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_genres() {
        assert_eq!(
            parse_genres("Action|Adventure|Sci-Fi"),
            vec!["Action", "Adventure", "Sci-Fi"]
        );
        assert_eq!(parse_genres("(no genres listed)"), vec!["(no genres listed)"]);
        assert!(parse_genres("").is_empty());
    }

    #[test]
    fn test_read_movies_with_quoted_title() {
        let data = "movieId,title,genres\n\
                    1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
                    11,\"American President, The (1995)\",Comedy|Drama|Romance\n";
        let movies = read_movies(data.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].id, 11);
        assert_eq!(movies[1].title, "American President, The (1995)");
        assert_eq!(movies[1].genres, vec!["Comedy", "Drama", "Romance"]);
    }

    #[test]
    fn test_read_ratings_ignores_timestamp() {
        let data = "userId,movieId,rating,timestamp\n1,1,4.0,964982703\n1,3,4.5,964981247\n";
        let ratings = read_ratings(data.as_bytes(), "ratings.csv").unwrap();

        assert_eq!(ratings, vec![Rating::new(1, 1, 4.0), Rating::new(1, 3, 4.5)]);
    }

    #[test]
    fn test_bad_row_reports_line() {
        let data = "userId,movieId,rating,timestamp\n1,1,4.0,1\n1,abc,4.0,1\n";
        let err = read_ratings(data.as_bytes(), "ratings.csv").unwrap_err();

        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, "ratings.csv");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_movies_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "movieId,title,genres").unwrap();
        writeln!(file, "2,Jumanji (1995),Adventure|Children|Fantasy").unwrap();

        let movies = parse_movies(file.path()).unwrap();
        assert_eq!(movies, vec![Movie::new(2, "Jumanji (1995)", &["Adventure", "Children", "Fantasy"])]);
    }

    #[test]
    fn test_missing_file() {
        let err = parse_movies(Path::new("/definitely/not/here/movies.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
