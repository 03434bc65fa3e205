use crate::api::AppState;
use crate::api::schemas::MessageResponse;
use crate::api::schemas::datasets::UserData;
use crate::error::{AppError, Result};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    response::IntoResponse,
};

const FILE_FIELD: &str = "file";

/// Accepts a multipart upload and appends the parsed table to the user's rows.
///
/// # Errors
/// Returns `AppError::UserNotFound` for unknown users, `AppError::DecodeFailure` for
/// non UTF-8 content and `AppError::InvalidRequest` if the `file` field is missing.
pub async fn upload(
    State(state): State<AppState>,
    Path(username): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    state.dataset_service.ensure_user(&username)?;

    let mut multipart = multipart.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

    let mut contents = None;
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() == Some(FILE_FIELD) {
            contents = Some(field.bytes().await.map_err(map_multipart_error)?);
            break;
        }
    }
    let contents = contents.ok_or_else(|| AppError::InvalidRequest(format!("Missing multipart field `{FILE_FIELD}`")))?;

    state.dataset_service.upload(&username, contents).await?;

    Ok(Json(MessageResponse::new("File uploaded successfully")))
}

/// Returns the user's rows wrapped as `{"data": [...]}`.
///
/// # Errors
/// Returns `AppError::UserNotFound` if the user is not registered.
pub async fn user_data(State(state): State<AppState>, Path(username): Path<String>) -> Result<impl IntoResponse> {
    let data = state.dataset_service.rows(&username)?;
    Ok(Json(UserData { data }))
}

/// Returns the user's rows as a bare JSON array.
///
/// # Errors
/// Returns `AppError::UserNotFound` if the user is not registered.
pub async fn raw_data(State(state): State<AppState>, Path(username): Path<String>) -> Result<impl IntoResponse> {
    Ok(Json(state.dataset_service.rows(&username)?))
}

fn map_multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::InvalidRequest(err.body_text())
    }
}
