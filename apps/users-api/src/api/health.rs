//! Readiness handler backed by a real read transaction on the store.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::embedded::check_health(&state.db)
                .await
                .map_err(|e| format!("Store read failed: {}", e))
        }),
    )];

    run_health_checks(checks).await.into_response()
}
