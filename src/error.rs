use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User already exists")]
    AlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("File must be UTF-8 encoded text")]
    DecodeFailure,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,
    #[error("Internal server error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::AlreadyExists => {
                tracing::debug!("Registration conflict");
                StatusCode::BAD_REQUEST
            }
            Self::UserNotFound => {
                tracing::debug!("User not found");
                StatusCode::NOT_FOUND
            }
            Self::DecodeFailure => {
                tracing::debug!("Upload is not valid UTF-8");
                StatusCode::BAD_REQUEST
            }
            Self::InvalidRequest(msg) => {
                tracing::debug!(message = %msg, "Invalid request");
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::PayloadTooLarge => {
                tracing::debug!("Upload too large");
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Self::Internal => {
                tracing::error!("Internal server error occurred");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}
