//! Command processing handler.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use interlink_protocol::CommandKind;
use serde::Deserialize;
use tracing::debug;

use super::{json_body, required};
use crate::commands;
use crate::response;

#[derive(Deserialize)]
pub struct ProcessCommandRequest {
    #[serde(default)]
    command: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// POST /api/commands/process
pub async fn process_command(body: Result<Json<ProcessCommandRequest>, JsonRejection>) -> Response {
    let req = match json_body(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };

    let Some(command) = required(req.command) else {
        return response::bad_request("Command is required");
    };
    let Some(kind) = required(req.kind) else {
        return response::bad_request("Command type is required");
    };
    let kind: CommandKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return response::bad_request(e.to_string()),
    };

    let result = commands::interpret(kind, &command).await;
    if result.is_negative() {
        debug!(kind = %kind, command = %command, "Command produced a negative result");
    }

    response::ok(result)
}
