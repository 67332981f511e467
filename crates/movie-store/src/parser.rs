//! Parsers for the dataset files.
//!
//! - `movies.jsonl`: one JSON movie object per line
//! - `credits.jsonl`: one JSON object per line, `{ "id", "cast", "crew" }`
//! - `ratings.dat`: `userId::movieId::rating::timestamp`
//!
//! Blank lines are skipped. Any other malformed line aborts the parse with an
//! error naming the file and line number.
//!
//! Rust concepts you'll learn here:
//! - serde derive with `flatten` and `default`
//! - Generic functions over `DeserializeOwned`
//! - Error handling with `?` and `map_err`

use crate::error::{DataLoadError, Result};
use crate::types::*;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Highest rating value accepted from `ratings.dat`
pub const MAX_RATING: f32 = 5.0;

/// One line of `movies.jsonl`
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRow {
    #[serde(flatten)]
    pub details: MovieDetails,
    /// Required; a row without a release date is rejected
    pub release: NaiveDate,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i32,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub imdb_id: String,
    #[serde(default)]
    pub production_companies: Vec<Company>,
    /// ISO 3166 codes
    #[serde(default)]
    pub production_countries: Vec<String>,
    #[serde(default)]
    pub belongs_to_collection: Option<CollectionRow>,
}

/// Collection reference embedded in a movie row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectionRow {
    pub id: CollectionId,
    pub name: String,
    pub poster_path: String,
    pub backdrop_path: String,
}

/// One line of `credits.jsonl`
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsRow {
    /// The movie these credits belong to
    pub id: MovieId,
    #[serde(default)]
    pub cast: Vec<CastCredit>,
    #[serde(default)]
    pub crew: Vec<CrewCredit>,
}

/// Reads a whole file, reporting a missing file as `FileNotFound`
fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parses a file holding one JSON object per line
fn parse_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = read_file(path)?;
    let file = file_label(path);
    let mut rows = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue; // Skip empty lines
        }

        let row = serde_json::from_str(line_trimmed).map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: idx + 1,
            reason: e.to_string(),
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Parse the movies file
///
/// A row without `release` is a `ParseError`. The date is copied into the
/// row's details.
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRow>> {
    let rows: Vec<MovieRow> = parse_json_lines(path)?;
    Ok(rows
        .into_iter()
        .map(|mut row| {
            row.details.release = row.release;
            row
        })
        .collect())
}

/// Parse the credits file
pub fn parse_credits(path: &Path) -> Result<Vec<CreditsRow>> {
    parse_json_lines(path)
}

/// Parse the ratings file
///
/// Format: userId::movieId::rating::timestamp
pub fn parse_ratings(path: &Path) -> Result<Vec<RatingFact>> {
    let content = read_file(path)?;
    let file = file_label(path);
    let mut ratings = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line_trimmed.split("::").collect();
        if parts.len() != 4 {
            return Err(DataLoadError::FieldCountMismatch {
                expected: 4,
                found: parts.len(),
                line: line_no,
            });
        }

        let parse_error = |field: &str, e: String| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: format!("Invalid {}: {}", field, e),
        };

        let user_id: UserId = parts[0]
            .parse()
            .map_err(|e: std::num::ParseIntError| parse_error("userId", e.to_string()))?;
        let movie_id: MovieId = parts[1]
            .parse()
            .map_err(|e: std::num::ParseIntError| parse_error("movieId", e.to_string()))?;
        let rating: f32 = parts[2]
            .parse()
            .map_err(|e: std::num::ParseFloatError| parse_error("rating", e.to_string()))?;
        let timestamp: i64 = parts[3]
            .parse()
            .map_err(|e: std::num::ParseIntError| parse_error("timestamp", e.to_string()))?;

        if !(0.0..=MAX_RATING).contains(&rating) {
            return Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: parts[2].to_string(),
            });
        }

        ratings.push(RatingFact {
            user_id,
            movie_id,
            rating,
            timestamp,
        });
    }

    Ok(ratings)
}
