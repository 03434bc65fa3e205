use crate::api::MgmtState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: fails once the server has started shutting down.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let ready = state.health_service.is_ready();
    if !ready {
        tracing::warn!("Readiness probe failed: shutting down");
    }

    let response = HealthResponse {
        status: if ready { "ok" } else { "shutting_down" }.to_string(),
        users: state.health_service.user_count(),
    };
    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (status_code, Json(response))
}
