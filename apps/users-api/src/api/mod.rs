use axum::{Router, routing::get};
use database::DatabaseResult;

pub mod health;
pub mod users;

use crate::state::AppState;

/// Creates the API routes.
///
/// Every sub-router has its state applied, so the result is a stateless `Router`
/// that `create_router` can wrap with docs and middleware.
pub fn routes(state: &AppState) -> DatabaseResult<Router> {
    Ok(Router::new()
        .nest("/users", users::router(state)?)
        .route("/metrics", get(observability::metrics_handler)))
}

/// Creates a router with the /ready endpoint, which opens a read transaction on
/// the store and answers 503 if that fails.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig};
    use database::embedded::EmbeddedConfig;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use test_utils::{TestDataBuilder, TestStore};
    use tower::ServiceExt;

    fn state(store: &TestStore) -> AppState {
        AppState {
            config: Config {
                app: app_info!(),
                database: EmbeddedConfig::new(store.path()),
                server: ServerConfig::default(),
                environment: Environment::Development,
            },
            db: store.db(),
        }
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_ready_reports_store() {
        let store = TestStore::new();
        let app = ready_router(state(&store));

        let (status, body) = call(
            &app,
            Request::builder().uri("/ready").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_users_routes_are_nested() {
        let store = TestStore::new();
        let app = routes(&state(&store)).unwrap();
        let builder = TestDataBuilder::from_test_name("api_users_nested");

        let payload = json!({
            "name": builder.name("user", "alice"),
            "email": builder.email("alice"),
            "password": builder.password(),
        });
        let (status, _) = call(
            &app,
            Request::builder()
                .method("POST")
                .uri("/users")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            &app,
            Request::builder()
                .uri("/users/search?email=alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let found: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_router_keeps_store_open_after_state_drops() {
        let store = TestStore::new();
        let state = state(&store);
        let db = state.db.clone();
        let app = routes(&state).unwrap();

        drop(state);
        assert!(std::sync::Arc::strong_count(&db) > 2, "router holds its own handle");

        drop(app);
        assert_eq!(std::sync::Arc::strong_count(&db), 2);
    }

    #[tokio::test]
    async fn test_metrics_route_answers() {
        let store = TestStore::new();
        let app = routes(&state(&store)).unwrap();

        let (status, _) = call(
            &app,
            Request::builder().uri("/metrics").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
