//! Handler tests for Users domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! They exercise only the users router over a real store file, not the full
//! application with docs, CORS and metrics layers.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{TestDataBuilder, TestStore};
use tower::ServiceExt; // For oneshot()

fn app(store: &TestStore) -> Router {
    let repo = EmbeddedUserRepository::new(store.db()).unwrap();
    handlers::router(UserService::new(repo))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_string(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn create(app: &Router, name: &str, email: &str) -> UserResponse {
    let (status, body) = send(
        app,
        "POST",
        "/",
        Some(json!({ "name": name, "email": email, "password": "s3cret" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_slice(&body).unwrap()
}

fn error_message(body: &[u8]) -> String {
    let value: Value = serde_json::from_slice(body).unwrap();
    value["error"]["message"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_user_handler_returns_201_without_password() {
    let store = TestStore::new();
    let app = app(&store);
    let builder = TestDataBuilder::from_test_name("handler_create_201");

    let (status, body) = send(
        &app,
        "POST",
        "/",
        Some(json!({
            "name": builder.name("user", "alice"),
            "email": builder.email("alice"),
            "password": builder.password()
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);

    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["name"], builder.name("user", "alice"));
    assert_eq!(value["email"], builder.email("alice"));
    assert!(value["id"].as_str().is_some());
    assert!(value.get("password").is_none());
}

#[tokio::test]
async fn test_create_user_handler_reports_missing_field() {
    let store = TestStore::new();
    let app = app(&store);

    let (status, body) = send(
        &app,
        "POST",
        "/",
        Some(json!({ "name": "Alice", "password": "s3cret" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Email is required");
}

#[tokio::test]
async fn test_create_user_handler_rejects_malformed_json() {
    let store = TestStore::new();
    let app = app(&store);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/", Some(json!({ "name": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_handler_rejects_overlong_name() {
    let store = TestStore::new();
    let app = app(&store);

    let (status, _) = send(
        &app,
        "POST",
        "/",
        Some(json!({ "name": "x".repeat(101), "email": "a@example.com", "password": "pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_handler_returns_409_on_used_email() {
    let store = TestStore::new();
    let app = app(&store);

    create(&app, "Alice", "alice@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/",
        Some(json!({ "name": "Other", "email": "alice@example.com", "password": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_message(&body), "User with this email already exists");
}

#[tokio::test]
async fn test_get_user_handler() {
    let store = TestStore::new();
    let app = app(&store);
    let alice = create(&app, "Alice", "alice@example.com").await;

    let (status, body) = send(&app, "GET", &format!("/{}", alice.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: UserResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched, alice);

    let (status, body) = send(&app, "GET", "/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "User not found");

    let (status, _) = send(&app, "GET", &format!("/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_handler() {
    let store = TestStore::new();
    let app = app(&store);

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Vec<UserResponse>>(&body).unwrap(), vec![]);

    create(&app, "Alice", "alice@example.com").await;
    create(&app, "Bob", "bob@example.com").await;

    let (_, body) = send(&app, "GET", "/", None).await;
    let users: Vec<UserResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn test_search_users_handler() {
    let store = TestStore::new();
    let app = app(&store);
    create(&app, "Alice", "alice@example.com").await;
    create(&app, "Bob", "bob@example.com").await;

    let (status, body) = send(&app, "GET", "/search?name=ALI", None).await;
    assert_eq!(status, StatusCode::OK);
    let users: Vec<UserResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Alice");

    let (status, body) = send(&app, "GET", "/search?email=example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Vec<UserResponse>>(&body).unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_users_handler_requires_a_query() {
    let store = TestStore::new();
    let app = app(&store);

    for uri in ["/search", "/search?name=&email="] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error_message(&body),
            "At least one query parameter (name or email) is required"
        );
    }
}

#[tokio::test]
async fn test_search_users_handler_returns_204_without_matches() {
    let store = TestStore::new();
    let app = app(&store);
    create(&app, "Alice", "alice@example.com").await;

    let (status, body) = send(&app, "GET", "/search?name=zed", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_update_user_handler() {
    let store = TestStore::new();
    let app = app(&store);
    let alice = create(&app, "Alice", "alice@example.com").await;
    create(&app, "Bob", "bob@example.com").await;
    let uri = format!("/{}", alice.id);

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "name": "Alicia" }))).await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["message"], "User updated successfully");

    let (_, body) = send(&app, "GET", &uri, None).await;
    let fetched: UserResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched.name, "Alicia");
    assert_eq!(fetched.email, "alice@example.com");

    let (status, _) = send(&app, "PUT", &uri, Some(json!({ "email": "bob@example.com" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let missing = format!("/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "PUT", &missing, Some(json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_handler() {
    let store = TestStore::new();
    let app = app(&store);
    let alice = create(&app, "Alice", "alice@example.com").await;
    let uri = format!("/{}", alice.id);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["message"], "User deleted successfully");

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
