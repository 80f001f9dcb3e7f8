//! Context build handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use interlink_protocol::{ContextResponse, ContextSnapshot, GitInfo};
use tracing::error;

use crate::prompt::PromptOptions;
use crate::response;
use crate::server::AppState;

/// GET /api/context/build
///
/// The environment snapshot is read per request, after the prompt is built.
pub async fn build_context(State(state): State<AppState>) -> Response {
    let options = PromptOptions {
        include_git_info: true,
        include_sandbox_status: true,
    };

    let system_prompt = match state.prompts.build(options).await {
        Ok(prompt) => prompt,
        Err(e) => {
            error!(error = %e, "Error building context");
            return response::internal_error(e.to_string());
        }
    };

    let env = state.environment.snapshot();
    let body = ContextResponse {
        system_prompt,
        context: ContextSnapshot {
            git_info: GitInfo {
                branch: env.branch,
                status: env.status,
            },
            sandbox: env.sandbox,
        },
    };

    (StatusCode::OK, Json(body)).into_response()
}
