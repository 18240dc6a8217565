//! Mapping from engine rejections to HTTP responses.

use axum::{http::StatusCode, Json};
use serde::Serialize;

use nextqueue_core::Rejection;

/// Error body returned by every API endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human readable message.
    pub error: String,
    /// Stable machine readable tag.
    pub reason: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<T, ApiError>;

/// Pick the status code for a rejection.
pub fn status_for(rejection: &Rejection) -> StatusCode {
    match rejection {
        r if r.is_not_found() => StatusCode::NOT_FOUND,
        Rejection::EmptyStageName | Rejection::EmptyWorkstationName => StatusCode::BAD_REQUEST,
        _ => StatusCode::CONFLICT,
    }
}

pub fn rejection_response(rejection: Rejection) -> ApiError {
    (
        status_for(&rejection),
        Json(ErrorResponse {
            error: rejection.to_string(),
            reason: rejection.reason().to_string(),
        }),
    )
}

pub fn not_found(error: impl Into<String>, reason: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: error.into(),
            reason: reason.to_string(),
        }),
    )
}
