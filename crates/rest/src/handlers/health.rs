//! Health check endpoint handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use petitio_persistence::core::PlatformStorage;
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Runs the backend's health check, so a datastore that cannot serve a
/// trivial query reports unhealthy.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Server is healthy
/// - `503 Service Unavailable` - Datastore health check failed
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: PlatformStorage,
{
    debug!("Processing health check request");

    let backend_name = state.storage().name();
    let (status, label) = match state.storage().health_check().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            warn!(error = %e, backend = backend_name, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    let body = serde_json::json!({
        "status": label,
        "backend": backend_name,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (status, Json(body)).into_response()
}
