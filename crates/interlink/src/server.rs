use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::response::Response;
use axum::routing::{get, post};
use interlink_protocol::routes;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::handlers;
use crate::prompt::{AmbientEnvironment, PromptBuilder};
use crate::response;
use crate::tools::ToolLookup;

/// Shared application state: the borrowed collaborators.
#[derive(Clone)]
pub struct AppState {
    pub tools: Arc<dyn ToolLookup>,
    pub prompts: Arc<dyn PromptBuilder>,
    pub environment: Arc<dyn AmbientEnvironment>,
}

impl AppState {
    pub fn new(
        tools: Arc<dyn ToolLookup>,
        prompts: Arc<dyn PromptBuilder>,
        environment: Arc<dyn AmbientEnvironment>,
    ) -> Self {
        Self {
            tools,
            prompts,
            environment,
        }
    }
}

/// Build the bridge router.
///
/// Each request runs in its own handler with its own error boundary; a
/// panicking handler becomes a 500 envelope for that request only. No timeout
/// is applied to any route.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(handlers::health))
        .route(routes::TOOLS_EXECUTE, post(handlers::execute_tool))
        .route(routes::CONTEXT_BUILD, get(handlers::build_context))
        .route(routes::COMMANDS_PROCESS, post(handlers::process_command))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };
    error!(error = %message, "Request handler panicked");
    response::internal_error(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_state, read_json};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    // --- health ---

    #[tokio::test]
    async fn health_returns_ok() {
        let resp = build_app(fixture_state()).oneshot(get("/api/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let resp = build_app(fixture_state()).oneshot(get("/api/nope")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    // --- tools ---

    #[tokio::test]
    async fn execute_tool_returns_tool_result_verbatim() {
        let req = post_json(
            "/api/tools/execute",
            json!({"name": "ls", "args": {"path": "."}}),
        );
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            read_json(resp).await,
            json!({"success": true, "result": {"files": ["file1.txt", "file2.txt"]}})
        );
    }

    #[tokio::test]
    async fn execute_tool_passes_args_through() {
        let req = post_json(
            "/api/tools/execute",
            json!({"name": "echo", "args": {"a": 1, "b": [true]}}),
        );
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        let body = read_json(resp).await;
        assert_eq!(body["result"], json!({"a": 1, "b": [true]}));
    }

    #[tokio::test]
    async fn execute_tool_without_args_gets_empty_mapping() {
        let req = post_json("/api/tools/execute", json!({"name": "echo"}));
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await["result"], json!({}));
    }

    #[tokio::test]
    async fn execute_tool_missing_name_is_400() {
        for body in [json!({"args": {}}), json!({"name": ""})] {
            let req = post_json("/api/tools/execute", body);
            let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                read_json(resp).await,
                json!({"success": false, "error": "Tool name is required"})
            );
        }
    }

    #[tokio::test]
    async fn execute_unknown_tool_is_404() {
        let req = post_json("/api/tools/execute", json!({"name": "grep"}));
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            read_json(resp).await,
            json!({"success": false, "error": "Tool 'grep' not found"})
        );
    }

    #[tokio::test]
    async fn failing_tool_is_500_with_message() {
        let req = post_json("/api/tools/execute", json!({"name": "fail"}));
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(resp).await,
            json!({"success": false, "error": "tool execution failed: disk on fire"})
        );
    }

    #[tokio::test]
    async fn panicking_tool_is_500_and_gateway_keeps_serving() {
        let app = build_app(fixture_state());

        let req = post_json("/api/tools/execute", json!({"name": "panic"}));
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "tool exploded");

        let resp = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400_envelope() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/tools/execute")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    // --- context ---

    #[tokio::test]
    async fn build_context_returns_prompt_and_snapshot() {
        let resp = build_app(fixture_state())
            .oneshot(get("/api/context/build"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_json(resp).await;
        assert!(
            body["systemPrompt"]
                .as_str()
                .unwrap()
                .starts_with(crate::prompt::SYSTEM_PREAMBLE)
        );
        assert!(
            body["systemPrompt"]
                .as_str()
                .unwrap()
                .contains("Current git branch: main")
        );
        assert_eq!(
            body["context"],
            json!({"gitInfo": {"branch": "main", "status": "clean"}, "sandbox": false})
        );
    }

    #[tokio::test]
    async fn build_context_failure_is_500() {
        let mut state = fixture_state();
        state.prompts = Arc::new(crate::testing::FailingPromptBuilder);

        let resp = build_app(state)
            .oneshot(get("/api/context/build"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(resp).await,
            json!({"success": false, "error": "failed to build system prompt: template missing"})
        );
    }

    // --- commands ---

    #[tokio::test]
    async fn slash_command_is_processed() {
        let req = post_json(
            "/api/commands/process",
            json!({"command": "/help", "type": "slash"}),
        );
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["result"]["command"], "help");
    }

    #[tokio::test]
    async fn unknown_slash_command_is_still_success() {
        let req = post_json(
            "/api/commands/process",
            json!({"command": "/bogus x", "type": "slash"}),
        );
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["result"]["result"]["unknown"], true);
        assert_eq!(body["result"]["args"], json!(["x"]));
    }

    #[tokio::test]
    async fn at_command_for_missing_file_is_error_payload() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("package.json").display().to_string();
        let req = post_json(
            "/api/commands/process",
            json!({"command": format!("@{}", missing), "type": "at"}),
        );
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["result"]["type"], "error");
        assert_eq!(body["result"]["path"], missing);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_command_is_processed() {
        let req = post_json(
            "/api/commands/process",
            json!({"command": "!echo hello", "type": "shell"}),
        );
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["result"]["command"], "echo hello");
        assert_eq!(body["result"]["success"], true);
        assert!(body["result"]["stdout"].as_str().unwrap().contains("hello"));
    }

    #[tokio::test]
    async fn command_validation_errors_are_400() {
        let cases = [
            (json!({"type": "slash"}), "Command is required"),
            (json!({"command": "", "type": "slash"}), "Command is required"),
            (json!({"command": "/help"}), "Command type is required"),
            (json!({"command": "/help", "type": ""}), "Command type is required"),
            (
                json!({"command": "/help", "type": "macro"}),
                "Invalid command type: macro",
            ),
        ];

        for (body, expected) in cases {
            let req = post_json("/api/commands/process", body);
            let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                read_json(resp).await,
                json!({"success": false, "error": expected})
            );
        }
    }

    #[tokio::test]
    async fn wrongly_typed_command_is_400() {
        let req = post_json(
            "/api/commands/process",
            json!({"command": 5, "type": "slash"}),
        );
        let resp = build_app(fixture_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(resp).await["success"], false);
    }
}
