//! Tool-lookup collaborator.
//!
//! The bridge never performs tool side effects itself: it looks a tool up by
//! name through [`ToolLookup`] and hands it the caller's arguments. Results
//! are opaque JSON.

pub mod builtin;
mod error;
mod registry;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::ToolError;
pub use registry::ToolRegistry;

/// Arguments passed to a tool: the `args` mapping of the request body.
pub type ToolArgs = serde_json::Map<String, serde_json::Value>;

/// A host tool the bridge can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn execute(&self, args: ToolArgs) -> Result<serde_json::Value, ToolError>;
}

/// Resolves tool names to tools.
pub trait ToolLookup: Send + Sync {
    fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>>;
}
