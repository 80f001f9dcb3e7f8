//! Tool execution errors.

use thiserror::Error;

/// Errors a tool can raise while executing.
///
/// The gateway reports these as 500 responses carrying the display text.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Failed to parse tool arguments.
    #[error("failed to parse tool arguments: {0}")]
    InvalidArguments(String),

    /// Tool execution failed.
    #[error("tool execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidArguments(e.to_string())
    }
}
