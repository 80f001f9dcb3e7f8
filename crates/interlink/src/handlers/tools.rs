//! Tool execution handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use serde::Deserialize;
use tracing::{debug, error};

use super::{json_body, required};
use crate::response;
use crate::server::AppState;
use crate::tools::ToolArgs;

#[derive(Deserialize)]
pub struct ExecuteToolRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    args: Option<ToolArgs>,
}

/// POST /api/tools/execute
pub async fn execute_tool(
    State(state): State<AppState>,
    body: Result<Json<ExecuteToolRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };

    let Some(name) = required(req.name) else {
        return response::bad_request("Tool name is required");
    };

    let Some(tool) = state.tools.get_tool(&name) else {
        return response::not_found(format!("Tool '{}' not found", name));
    };

    debug!(tool = %name, "Executing tool");
    match tool.execute(req.args.unwrap_or_default()).await {
        Ok(result) => response::ok(result),
        Err(e) => {
            error!(tool = %name, error = %e, "Error executing tool");
            response::internal_error(e.to_string())
        }
    }
}
