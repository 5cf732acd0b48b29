use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;

use movie_recommender::api::{create_router, handlers::MAX_QUERY_CHARS, AppState};
use movie_recommender::middleware::REQUEST_ID_HEADER;
use movie_recommender::models::{CatalogEntry, RatingObservation};
use movie_recommender::services::{EngineSettings, Recommender};

fn create_test_server() -> TestServer {
    let ratings = [
        (1, 1, 5.0),
        (1, 2, 4.0),
        (1, 3, 3.5),
        (2, 1, 4.5),
        (2, 3, 4.0),
        (3, 1, 2.0),
        (3, 4, 5.0),
    ]
    .into_iter()
    .map(|(user, item, rating)| RatingObservation::new(user, item, rating));
    let movies = vec![
        CatalogEntry::new(1, "Toy Story (1995)"),
        CatalogEntry::new(2, "Jumanji (1995)"),
        CatalogEntry::new(3, "Heat (1995)"),
        CatalogEntry::new(4, "Casino (1995)"),
        CatalogEntry::new(5, "Sabrina (1995)"),
    ];
    let recommender = Recommender::build(ratings, movies, EngineSettings::default());
    TestServer::new(create_router(AppState::new(recommender))).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_recommendations_by_title() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "TOY STORY")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["resolved"]["item_id"], 1);
    assert_eq!(body["cohort_size"], 2);

    // Heat: 3.5 + 4.0, Jumanji: 4.0
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["title"], "Heat (1995)");
    assert_eq!(recs[0]["score"], 7.5);
    assert_eq!(recs[1]["title"], "Jumanji (1995)");
}

#[tokio::test]
async fn test_unknown_title_is_not_found() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "zzzzzzzz")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Movie not found in the database.");
}

#[tokio::test]
async fn test_title_search_lists_candidates() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/titles/search")
        .add_query_param("q", "casino")
        .await;

    response.assert_status_ok();
    let matches: Vec<serde_json::Value> = response.json();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["item_id"], 4);
    assert_eq!(matches[0]["title"], "Casino (1995)");
}

#[tokio::test]
async fn test_title_search_without_match_is_empty() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/titles/search")
        .add_query_param("q", "qqqqqqqqqq")
        .await;

    response.assert_status_ok();
    let matches: Vec<serde_json::Value> = response.json();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_overlong_queries_are_rejected() {
    let server = create_test_server();
    let query = "toy story ".repeat(MAX_QUERY_CHARS);

    let response = server
        .get("/api/v1/titles/search")
        .add_query_param("q", &query)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", &query)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        format!("Query must be at most {} characters", MAX_QUERY_CHARS)
    );
}

#[tokio::test]
async fn test_query_at_length_limit_is_accepted() {
    let server = create_test_server();
    let query = "q".repeat(MAX_QUERY_CHARS);

    let response = server
        .get("/api/v1/titles/search")
        .add_query_param("q", &query)
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_recommendations_by_item_id() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/1/recommendations").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Toy Story (1995)");
    let ids: Vec<u64> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["item_id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 2]);
}

#[tokio::test]
async fn test_unrated_item_has_empty_recommendations() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/999/recommendations").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["title"].is_null());
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_user_signature() {
    let server = create_test_server();

    let response = server.get("/api/v1/users/1/signature").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["user_id"], 1);
    assert_eq!(body["signature"].as_array().unwrap().len(), 10);

    let response = server.get("/api/v1/users/77/signature").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_similarity() {
    let server = create_test_server();

    let response = server.get("/api/v1/users/2/similarity/2").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["estimated_jaccard"], 1.0);

    let response = server.get("/api/v1/users/1/similarity/77").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let request_id = "0b5a6c1e-2f3d-4e8a-9c7b-1d2e3f4a5b6c";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderValue::from_static(request_id),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(REQUEST_ID_HEADER), request_id);
}

#[tokio::test]
async fn test_request_id_generated_when_missing() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let header = response.header(REQUEST_ID_HEADER);
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
