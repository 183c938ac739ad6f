//! End-to-end dispatch tests: the full route table over the in-memory
//! repository, exercised through `Router::dispatch` exactly as the host
//! transport does.

#![cfg(feature = "local-repo")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use serde_json::{json, Value};

use aynia_api::db::repositories::LocalRepository;
use aynia_api::http::{setup_routes, AppState, Router};

fn app() -> Router {
    let state = AppState::new(Arc::new(LocalRepository::new()));
    setup_routes(state)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("http://localhost{path}"))
        .body(Body::empty())
        .unwrap()
}

fn with_json_body(method: &str, path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(format!("http://localhost{path}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_user(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "passwordHash": "argon2id$v=19$...",
    })
}

#[tokio::test]
async fn api_info_and_health_respond() {
    let router = app();

    let response = router.dispatch(get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["message"], "AYNIA API");

    let response = router.dispatch(get("/health")).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "connected");
}

#[tokio::test]
async fn unknown_path_gets_the_router_404_envelope() {
    let router = app();
    let response = router.dispatch(get("/api/unknown")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Not found" })
    );
}

#[tokio::test]
async fn user_crud_round_trip() {
    let router = app();

    // Create
    let response = router
        .dispatch(with_json_body(
            "POST",
            "/api/user",
            sample_user("rin", "rin@example.com"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["username"], "rin");
    assert!(body["data"].get("passwordHash").is_none());
    let id = body["data"]["id"].as_i64().unwrap();

    // Read back
    let response = router.dispatch(get(&format!("/api/user/{id}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "rin@example.com");

    // List
    let response = router.dispatch(get("/api/user")).await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Update
    let response = router
        .dispatch(with_json_body(
            "PUT",
            &format!("/api/user/{id}"),
            json!({ "email": "new@example.com" }),
        ))
        .await;
    let body = body_json(response).await;
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["data"]["email"], "new@example.com");

    // Delete
    let response = router
        .dispatch(with_json_body("DELETE", &format!("/api/user/{id}"), json!({})))
        .await;
    let body = body_json(response).await;
    assert_eq!(body["message"], "User deleted successfully");
    assert_eq!(body["data"], Value::Null);

    // Gone
    let response = router.dispatch(get(&format!("/api/user/{id}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn user_validation_envelopes() {
    let router = app();

    router
        .dispatch(with_json_body(
            "POST",
            "/api/user",
            sample_user("rin", "rin@example.com"),
        ))
        .await;

    // Duplicate email
    let response = router
        .dispatch(with_json_body(
            "POST",
            "/api/user",
            sample_user("other", "rin@example.com"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Email already exists");

    // Non-numeric id
    let response = router.dispatch(get("/api/user/abc")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid user ID");

    // Malformed JSON body
    let request = Request::builder()
        .method("POST")
        .uri("http://localhost/api/user")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.dispatch(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn anime_catalog_flows() {
    let router = app();

    let create = |title: &str, popularity: i32, season: Option<&str>| {
        let mut body = json!({
            "titleRomaji": title,
            "genres": ["Action"],
            "popularity": popularity,
        });
        if let Some(season) = season {
            body["season"] = json!(season);
            body["seasonYear"] = json!(2024);
        }
        with_json_body("POST", "/api/anime", body)
    };

    let response = router.dispatch(create("frieren", 100, Some("WINTER"))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let frieren_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    router.dispatch(create("dungeon meshi", 90, Some("WINTER"))).await;
    router.dispatch(create("yuru camp", 50, None)).await;

    // Paginated list, ordered by popularity
    let response = router.dispatch(get("/api/anime?page=1&limit=2")).await;
    let body = body_json(response).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["titleRomaji"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["frieren", "dungeon meshi"]);

    // Search hits the search route, not /api/anime/:id
    let response = router.dispatch(get("/api/anime/search?title=frieren")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Search without a title
    let response = router.dispatch(get("/api/anime/search")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Title query parameter is required"
    );

    // Genre listing
    let response = router.dispatch(get("/api/anime/genre/Action")).await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    // Season listing with raw string params
    let response = router.dispatch(get("/api/anime/season/WINTER/2024")).await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Season validation
    let response = router.dispatch(get("/api/anime/season/MONSOON/2024")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Invalid year
    let response = router.dispatch(get("/api/anime/season/WINTER/year")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid year");

    // Get by id
    let response = router.dispatch(get(&format!("/api/anime/{frieren_id}"))).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["titleRomaji"], "frieren");

    // Update then delete
    let response = router
        .dispatch(with_json_body(
            "PUT",
            &format!("/api/anime/{frieren_id}"),
            json!({ "averageScore": 92 }),
        ))
        .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["averageScore"], 92);

    let response = router
        .dispatch(with_json_body(
            "DELETE",
            &format!("/api/anime/{frieren_id}"),
            json!({}),
        ))
        .await;
    assert_eq!(body_json(response).await["message"], "Anime deleted successfully");

    let response = router.dispatch(get(&format!("/api/anime/{frieren_id}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Anime not found");
}

#[tokio::test]
async fn method_mismatch_is_a_router_404() {
    let router = app();
    // No PATCH route exists for /api/user
    let response = router
        .dispatch(with_json_body("PATCH", "/api/user", json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Not found" })
    );
}
