use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::panic::Location;
use thiserror::Error;
use tracing::{debug, error};

use crate::db::services::StoreError;
use crate::web::templates;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Internal server error: {message}")]
    Internal {
        message: String,
        location: &'static Location<'static>,
    },
}

impl AppError {
    /// Builds an `Internal` error tagged with the caller's source location.
    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
            location: Location::caller(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": msg }))).into_response()
            }
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            AppError::NotFound(msg) => {
                debug!(reason = %msg, "Responding with 404 page.");
                templates::error_page(StatusCode::NOT_FOUND)
            }
            AppError::Internal { message, location } => {
                error!(
                    error = %message,
                    source_file = location.file(),
                    source_line = location.line(),
                    "Server Error"
                );
                templates::error_page(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl From<StoreError> for AppError {
    #[track_caller]
    fn from(err: StoreError) -> Self {
        AppError::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_records_caller_location() {
        let err = AppError::internal("boom");
        match err {
            AppError::Internal { message, location } => {
                assert_eq!(message, "boom");
                assert!(location.file().ends_with("error.rs"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PayloadTooLarge("x".into()).into_response().status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StoreError::IdSpaceExhausted).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
