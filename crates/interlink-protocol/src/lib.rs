//! Wire types for the interlink bridge.
//!
//! Shared between the gateway (which serializes them) and callers in the other
//! runtime (which deserialize them). All bodies are JSON.
//!
//! | Route | Request | Response |
//! |---|---|---|
//! | `GET /api/health` | none | [`HealthResponse`] |
//! | `POST /api/tools/execute` | [`ToolExecuteRequest`] | [`SuccessEnvelope`] of tool output |
//! | `GET /api/context/build` | none | [`ContextResponse`] |
//! | `POST /api/commands/process` | [`CommandRequest`] | [`SuccessEnvelope`] of [`CommandResult`] |
//!
//! Protocol-level failures on every route use [`ErrorEnvelope`].

mod command;
mod context;
mod envelope;

pub use command::{
    CommandKind, CommandRequest, CommandResult, DirEntry, PathOutput, ShellOutput, SlashOutput,
    SlashReply, UnknownCommandKind,
};
pub use context::{ContextResponse, ContextSnapshot, GitInfo};
pub use envelope::{ErrorEnvelope, HealthResponse, SuccessEnvelope, ToolExecuteRequest};

/// Route paths served by the gateway.
pub mod routes {
    pub const HEALTH: &str = "/api/health";
    pub const TOOLS_EXECUTE: &str = "/api/tools/execute";
    pub const CONTEXT_BUILD: &str = "/api/context/build";
    pub const COMMANDS_PROCESS: &str = "/api/commands/process";
}
