use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogEntry, ItemId, RatingObservation, UserId},
};

/// Source of the two input tables
///
/// Implementations hand the engine typed records; any parse failure is
/// reported here so the engine never sees malformed rows.
#[cfg_attr(test, mockall::automock)]
pub trait DatasetSource: Send + Sync {
    /// All (user, movie, rating) observations in file order
    fn load_ratings(&self) -> AppResult<Vec<RatingObservation>>;

    /// All catalog rows in file order
    fn load_catalog(&self) -> AppResult<Vec<CatalogEntry>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    item_id: ItemId,
    rating: f32,
}

#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "movieId")]
    item_id: ItemId,
    title: String,
}

/// MovieLens-style CSV files with header rows
#[derive(Debug, Clone)]
pub struct CsvDataset {
    ratings_path: PathBuf,
    movies_path: PathBuf,
}

impl CsvDataset {
    pub fn new(ratings_path: impl Into<PathBuf>, movies_path: impl Into<PathBuf>) -> Self {
        Self {
            ratings_path: ratings_path.into(),
            movies_path: movies_path.into(),
        }
    }
}

impl DatasetSource for CsvDataset {
    fn load_ratings(&self) -> AppResult<Vec<RatingObservation>> {
        let file = std::fs::File::open(&self.ratings_path)?;
        read_ratings(file, &self.ratings_path.display().to_string())
    }

    fn load_catalog(&self) -> AppResult<Vec<CatalogEntry>> {
        let file = std::fs::File::open(&self.movies_path)?;
        read_catalog(file, &self.movies_path.display().to_string())
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

/// Parses a ratings table (`userId,movieId,rating[,...]`)
pub fn read_ratings<R: Read>(reader: R, source_name: &str) -> AppResult<Vec<RatingObservation>> {
    let mut reader = csv::Reader::from_reader(reader);
    let rows = reader
        .deserialize::<RatingRow>()
        .map(|row| {
            row.map(|r| RatingObservation::new(r.user_id, r.item_id, r.rating))
                .map_err(|e| malformed(source_name, e))
        })
        .collect::<AppResult<Vec<RatingObservation>>>();
    rows
}

/// Parses a movie table (`movieId,title[,...]`)
pub fn read_catalog<R: Read>(reader: R, source_name: &str) -> AppResult<Vec<CatalogEntry>> {
    let mut reader = csv::Reader::from_reader(reader);
    let rows = reader
        .deserialize::<MovieRow>()
        .map(|row| {
            row.map(|r| CatalogEntry::new(r.item_id, r.title))
                .map_err(|e| malformed(source_name, e))
        })
        .collect::<AppResult<Vec<CatalogEntry>>>();
    rows
}

fn malformed(source_name: &str, error: csv::Error) -> AppError {
    let line = error
        .position()
        .map(|p| p.line().to_string())
        .unwrap_or_else(|| "?".to_string());
    AppError::MalformedInput {
        source_name: source_name.to_string(),
        message: format!("line {}: {}", line, error),
    }
}
