//! Test doubles for the collaborator traits.

use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::json;

use crate::prompt::{
    EnvironmentSnapshot, PromptBuilder, PromptError, PromptOptions, SystemPromptBuilder,
};
use crate::server::AppState;
use crate::tools::{Tool, ToolArgs, ToolError, ToolRegistry};

/// Tool with a canned execute behaviour.
pub struct FakeTool {
    name: &'static str,
    behaviour: Behaviour,
}

enum Behaviour {
    Return(serde_json::Value),
    EchoArgs,
    Fail(&'static str),
    Panic,
}

#[async_trait]
impl Tool for FakeTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "test tool"
    }

    async fn execute(&self, args: ToolArgs) -> Result<serde_json::Value, ToolError> {
        match &self.behaviour {
            Behaviour::Return(value) => Ok(value.clone()),
            Behaviour::EchoArgs => Ok(serde_json::Value::Object(args)),
            Behaviour::Fail(message) => Err(ToolError::ExecutionFailed(message.to_string())),
            Behaviour::Panic => panic!("tool exploded"),
        }
    }
}

pub struct FailingPromptBuilder;

#[async_trait]
impl PromptBuilder for FailingPromptBuilder {
    async fn build(&self, _options: PromptOptions) -> Result<String, PromptError> {
        Err(PromptError::Build("template missing".to_string()))
    }
}

pub fn fixture_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(FakeTool {
        name: "ls",
        behaviour: Behaviour::Return(json!({"files": ["file1.txt", "file2.txt"]})),
    }));
    registry.register(Arc::new(FakeTool {
        name: "echo",
        behaviour: Behaviour::EchoArgs,
    }));
    registry.register(Arc::new(FakeTool {
        name: "fail",
        behaviour: Behaviour::Fail("disk on fire"),
    }));
    registry.register(Arc::new(FakeTool {
        name: "panic",
        behaviour: Behaviour::Panic,
    }));
    registry
}

/// Collaborators for a host on branch `main`, clean, sandbox off.
pub fn fixture_state() -> AppState {
    let environment = Arc::new(EnvironmentSnapshot {
        branch: "main".to_string(),
        status: "clean".to_string(),
        sandbox: false,
    });
    AppState::new(
        Arc::new(fixture_registry()),
        Arc::new(SystemPromptBuilder::new(environment.clone())),
        environment,
    )
}

pub async fn read_json(resp: Response) -> serde_json::Value {
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
