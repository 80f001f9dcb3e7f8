//! Builtin host tools backed by the command interpreters.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{Tool, ToolArgs, ToolError, ToolRegistry};
use crate::commands::{process_at_command, process_shell_command};

/// Registry holding every builtin tool.
pub fn registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ShellTool));
    registry.register(Arc::new(ReadPathTool));
    registry
}

fn parse_args<T: DeserializeOwned>(args: ToolArgs) -> Result<T, ToolError> {
    Ok(serde_json::from_value(serde_json::Value::Object(args))?)
}

// ============================================================================
// run_shell_command
// ============================================================================

#[derive(Deserialize)]
struct ShellArgs {
    command: String,
}

/// Runs a shell command on the host and returns the captured output.
pub struct ShellTool;

#[async_trait]
impl Tool for ShellTool {
    fn name(&self) -> &str {
        "run_shell_command"
    }

    fn description(&self) -> &str {
        "Execute a shell command on the host and capture stdout and stderr."
    }

    async fn execute(&self, args: ToolArgs) -> Result<serde_json::Value, ToolError> {
        let args: ShellArgs = parse_args(args)?;
        let output = process_shell_command(&args.command).await;
        Ok(serde_json::to_value(output)?)
    }
}

// ============================================================================
// read_path
// ============================================================================

#[derive(Deserialize)]
struct ReadPathArgs {
    path: String,
}

/// Reads a file or lists a directory on the host.
pub struct ReadPathTool;

#[async_trait]
impl Tool for ReadPathTool {
    fn name(&self) -> &str {
        "read_path"
    }

    fn description(&self) -> &str {
        "Read a file, or list the immediate entries of a directory."
    }

    async fn execute(&self, args: ToolArgs) -> Result<serde_json::Value, ToolError> {
        let args: ReadPathArgs = parse_args(args)?;
        let output = process_at_command(&args.path).await;
        Ok(serde_json::to_value(output)?)
    }
}
