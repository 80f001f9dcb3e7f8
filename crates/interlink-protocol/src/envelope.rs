//! Response envelopes and tool request body.

use serde::{Deserialize, Serialize};

/// Successful dispatch: `{"success": true, "result": ...}`.
///
/// A successful envelope may still carry an application-level negative
/// outcome inside `result` (unknown command, missing file, failed shell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub result: T,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(result: T) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// Protocol-level failure: `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Body of `POST /api/tools/execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecuteRequest {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
}
