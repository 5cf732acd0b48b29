use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Titles
        .route("/titles/search", get(handlers::search_titles))
        // Recommendations
        .route("/recommendations", get(handlers::recommend_by_title))
        .route(
            "/movies/:item_id/recommendations",
            get(handlers::recommend_by_item),
        )
        // User signatures
        .route("/users/:user_id/signature", get(handlers::user_signature))
        .route(
            "/users/:user_a/similarity/:user_b",
            get(handlers::user_similarity),
        )
}
