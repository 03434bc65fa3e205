use crate::api::AppState;
use crate::api::schemas::MessageResponse;
use crate::api::schemas::accounts::{Registration, UserList};
use crate::error::{AppError, Result};
use axum::extract::rejection::JsonRejection;
use axum::{Json, extract::State, response::IntoResponse};

/// Registers a new user.
///
/// # Errors
/// Returns `AppError::AlreadyExists` if the username is taken and
/// `AppError::InvalidRequest` if the body is not a valid registration.
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Registration>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    state.account_service.register(payload.username, payload.password).await?;
    Ok(Json(MessageResponse::new("User registered successfully")))
}

pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    Json(UserList { users: state.account_service.list_users() })
}
