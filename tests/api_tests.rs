use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

use movie_recommender_api::{
    catalog::{Catalog, SimilarityMatrix},
    models::{Movie, MovieId, RecommendationResponse},
    routes::{create_router, AppState},
    services::{PosterProvider, Recommender},
};

/// Serves a poster for every movie except Heat
struct StubPosters;

#[async_trait::async_trait]
impl PosterProvider for StubPosters {
    async fn fetch_poster(&self, movie_id: MovieId) -> Option<String> {
        (movie_id != MovieId(949)).then(|| format!("https://image.test/t/p/w500/{}.jpg", movie_id))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn create_test_server() -> TestServer {
    let movies = vec![
        (19995, "Avatar"),
        (348, "Alien"),
        (679, "Aliens"),
        (597, "Titanic"),
        (949, "Heat"),
        (14160, "Up"),
        (920, "Cars"),
    ]
    .into_iter()
    .map(|(id, title)| Movie {
        id: MovieId(id),
        title: title.to_string(),
    })
    .collect();

    let similarity = SimilarityMatrix::from_rows(vec![
        vec![1.0, 0.8, 0.7, 0.3, 0.1, 0.2, 0.5],
        vec![0.8, 1.0, 0.9, 0.1, 0.2, 0.0, 0.1],
        vec![0.7, 0.9, 1.0, 0.1, 0.3, 0.0, 0.1],
        vec![0.3, 0.1, 0.1, 1.0, 0.2, 0.1, 0.1],
        vec![0.1, 0.2, 0.3, 0.2, 1.0, 0.0, 0.0],
        vec![0.2, 0.0, 0.0, 0.1, 0.0, 1.0, 0.6],
        vec![0.5, 0.1, 0.1, 0.1, 0.0, 0.6, 1.0],
    ])
    .unwrap();

    let catalog = Arc::new(Catalog::new(movies, similarity).unwrap());
    let recommender = Recommender::new(catalog.clone(), Arc::new(StubPosters));
    let app = create_router(Arc::new(AppState {
        catalog,
        recommender,
    }));
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_list_movies_in_catalog_order() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies").await;
    response.assert_status_ok();

    let movies: Vec<serde_json::Value> = response.json();
    assert_eq!(movies.len(), 7);
    assert_eq!(movies[0]["title"], "Avatar");
    assert_eq!(movies[0]["id"], 19995);
    assert_eq!(movies[6]["title"], "Cars");
}

#[tokio::test]
async fn test_search_movies() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/movies/search")
        .add_query_param("q", "alien")
        .await;
    response.assert_status_ok();

    let movies: Vec<serde_json::Value> = response.json();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[1]["title"], "Aliens");
}

#[tokio::test]
async fn test_search_empty_query() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/movies/search")
        .add_query_param("q", " ")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Aliens" }))
        .await;
    response.assert_status_ok();

    let body: RecommendationResponse = response.json();
    assert_eq!(body.selected, "Aliens");

    let titles: Vec<&str> = body.recommendations.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Alien", "Avatar", "Heat", "Titanic", "Cars"]);
    assert!(body
        .recommendations
        .windows(2)
        .all(|w| w[0].score >= w[1].score));

    // Heat has no poster; the rest of the response is unaffected
    assert_eq!(body.recommendations[2].poster_url, None);
    assert_eq!(
        body.recommendations[0].poster_url.as_deref(),
        Some("https://image.test/t/p/w500/348.jpg")
    );
}

#[tokio::test]
async fn test_recommendations_unknown_title() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Not A Movie" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Not A Movie"));
}

#[tokio::test]
async fn test_recommendations_empty_title() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_header_echoed() {
    let server = create_test_server();
    let id = uuid::Uuid::new_v4().to_string();
    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_str(&id).unwrap(),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), id.as_str());
}

#[tokio::test]
async fn test_recommendations_non_finite_score_serialized_as_null() {
    let movies = vec![(19995, "Avatar"), (348, "Alien"), (949, "Heat")]
        .into_iter()
        .map(|(id, title)| Movie {
            id: MovieId(id),
            title: title.to_string(),
        })
        .collect();
    let similarity = SimilarityMatrix::from_rows(vec![
        vec![1.0, f32::NAN, 0.4],
        vec![f32::NAN, 1.0, 0.2],
        vec![0.4, 0.2, 1.0],
    ])
    .unwrap();

    let catalog = Arc::new(Catalog::new(movies, similarity).unwrap());
    let recommender = Recommender::new(catalog.clone(), Arc::new(StubPosters));
    let server = TestServer::new(create_router(Arc::new(AppState {
        catalog,
        recommender,
    })))
    .unwrap();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Avatar" }))
        .await;
    response.assert_status_ok();

    let raw: serde_json::Value = response.json();
    assert!(raw["recommendations"][1]["score"].is_null());

    let body: RecommendationResponse = response.json();
    let titles: Vec<&str> = body.recommendations.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Heat", "Alien"]);
    assert_eq!(body.recommendations[0].score, Some(0.4));
    assert_eq!(body.recommendations[1].score, None);
}
