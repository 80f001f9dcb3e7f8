//! JSON response helpers for protocol-level failures.
//!
//! All error bodies share the `{"success": false, "error": "..."}` envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use interlink_protocol::{ErrorEnvelope, SuccessEnvelope};
use serde::Serialize;

pub fn ok<T: Serialize>(result: T) -> Response {
    (StatusCode::OK, Json(SuccessEnvelope::new(result))).into_response()
}

pub fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorEnvelope::new(message))).into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    error(StatusCode::BAD_REQUEST, message)
}

pub fn not_found(message: impl Into<String>) -> Response {
    error(StatusCode::NOT_FOUND, message)
}

pub fn internal_error(message: impl Into<String>) -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, message)
}
