//! HTTP request handlers.

mod commands;
mod context;
mod health;
mod tools;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;

use crate::response;

pub use commands::process_command;
pub use context::build_context;
pub use health::health;
pub use tools::execute_tool;

/// Unwrap a JSON body, turning any rejection into a 400 envelope.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(response::bad_request(rejection.body_text())),
    }
}

/// A required string field: absent and empty are both missing.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
