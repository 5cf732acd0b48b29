use serde::{Deserialize, Serialize};

pub mod catalog;

pub use catalog::{Catalog, CatalogEntry};

/// Identifier of a user in the ratings table
pub type UserId = u32;

/// Identifier of a movie in both the ratings table and the catalog
pub type ItemId = u32;

/// A single (user, movie, rating) observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingObservation {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: f32,
}

impl RatingObservation {
    pub fn new(user_id: UserId, item_id: ItemId, rating: f32) -> Self {
        Self {
            user_id,
            item_id,
            rating,
        }
    }
}

impl From<(UserId, ItemId, f32)> for RatingObservation {
    fn from((user_id, item_id, rating): (UserId, ItemId, f32)) -> Self {
        Self::new(user_id, item_id, rating)
    }
}

/// Candidate item with its score summed over the liked cohort
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub item_id: ItemId,
    pub score: f64,
}

/// Fixed-length MinHash sketch of a user's rated items
pub type UserSignature = Vec<u64>;

// ============================================================================
// Response Types
// ============================================================================

/// A catalog title that survived fuzzy matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleCandidate {
    pub item_id: ItemId,
    pub title: String,
    pub ratio: u8,
}

/// Outcome of resolving a free-text query against the catalog
///
/// `candidates` is the diagnostic listing: every surviving title in rank
/// order, with the resolved one first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleMatch {
    pub item_id: ItemId,
    pub title: String,
    pub ratio: u8,
    pub candidates: Vec<TitleCandidate>,
}

impl TitleMatch {
    /// Titles of the surviving candidates, best first
    pub fn candidate_titles(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.title.as_str()).collect()
    }
}

/// A recommended movie returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    /// `None` when the ratings reference an id missing from the catalog
    pub title: Option<String>,
    pub score: f64,
}

/// Recommendations for a movie resolved from a title query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSet {
    pub query: String,
    pub resolved: TitleMatch,
    pub cohort_size: usize,
    pub recommendations: Vec<Recommendation>,
}
