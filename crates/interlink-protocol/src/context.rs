//! Context build response.

use serde::{Deserialize, Serialize};

/// Body of `GET /api/context/build`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponse {
    pub system_prompt: String,
    pub context: ContextSnapshot,
}

/// Ambient environment as seen by the host at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    pub git_info: GitInfo,
    pub sandbox: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
    pub branch: String,
    pub status: String,
}
