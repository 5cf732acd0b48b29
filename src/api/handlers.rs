use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{ItemId, Recommendation, RecommendationSet, TitleCandidate, UserId};

use super::AppState;

/// Longest title query accepted; fuzzy matching is quadratic in its length
pub const MAX_QUERY_CHARS: usize = 256;

fn check_query_length(query: &str) -> AppResult<()> {
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Query must be at most {} characters",
            MAX_QUERY_CHARS
        )));
    }
    Ok(())
}

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ItemRecommendationsResponse {
    pub item_id: ItemId,
    pub title: Option<String>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct SignatureResponse {
    pub user_id: UserId,
    pub signature: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub user_a: UserId,
    pub user_b: UserId,
    pub estimated_jaccard: f64,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Ranked catalog titles matching a free-text query
pub async fn search_titles(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<TitleCandidate>>> {
    check_query_length(&params.q)?;
    let matches = state
        .recommender
        .resolve(&params.q)
        .map(|m| m.candidates)
        .unwrap_or_default();
    Ok(Json(matches))
}

/// Recommendations for a movie given by (possibly misspelled) title
pub async fn recommend_by_title(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationSet>> {
    check_query_length(&params.title)?;
    match state.recommender.recommend_for_title(&params.title) {
        Some(set) => Ok(Json(set)),
        None => {
            tracing::info!(%request_id, query = %params.title, "Movie not found");
            Err(AppError::NotFound(
                "Movie not found in the database.".to_string(),
            ))
        }
    }
}

/// Recommendations for a movie given by id; unknown ids yield an empty list
pub async fn recommend_by_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Json<ItemRecommendationsResponse> {
    let recommender = &state.recommender;
    Json(ItemRecommendationsResponse {
        item_id,
        title: recommender.catalog().title(item_id).map(str::to_string),
        recommendations: recommender.recommend_for_item(item_id),
    })
}

/// MinHash signature of a user's rated movies
pub async fn user_signature(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<SignatureResponse>> {
    let signature = state
        .recommender
        .signature(user_id)
        .ok_or_else(|| AppError::NotFound(format!("User {} has no ratings", user_id)))?;

    Ok(Json(SignatureResponse {
        user_id,
        signature: signature.clone(),
    }))
}

/// Estimated overlap between two users' rated movies
pub async fn user_similarity(
    State(state): State<AppState>,
    Path((user_a, user_b)): Path<(UserId, UserId)>,
) -> AppResult<Json<SimilarityResponse>> {
    for user_id in [user_a, user_b] {
        if !state.recommender.index().contains_user(user_id) {
            return Err(AppError::NotFound(format!("User {} has no ratings", user_id)));
        }
    }

    let estimated_jaccard = state
        .recommender
        .estimated_similarity(user_a, user_b)
        .ok_or_else(|| AppError::Internal("Signatures have mismatched lengths".to_string()))?;

    Ok(Json(SimilarityResponse {
        user_a,
        user_b,
        estimated_jaccard,
    }))
}
