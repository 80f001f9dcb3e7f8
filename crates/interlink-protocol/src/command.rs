//! Command processing types.
//!
//! Every interpreter outcome is a successful dispatch. Application-level
//! failures (unknown command, unreadable path, nonzero shell exit) live inside
//! the payload; see [`CommandResult::is_negative`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CommandKind
// ============================================================================

/// Interpreter selected by the caller. Never inferred from the command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// `/name args...`
    Slash,
    /// `@path`
    At,
    /// `!shell command`
    Shell,
}

impl CommandKind {
    /// The prefix character conventionally used for this kind.
    pub fn sigil(self) -> char {
        match self {
            Self::Slash => '/',
            Self::At => '@',
            Self::Shell => '!',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slash => "slash",
            Self::At => "at",
            Self::Shell => "shell",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid command type: {0}")]
pub struct UnknownCommandKind(pub String);

impl FromStr for CommandKind {
    type Err = UnknownCommandKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slash" => Ok(Self::Slash),
            "at" => Ok(Self::At),
            "shell" => Ok(Self::Shell),
            other => Err(UnknownCommandKind(other.to_string())),
        }
    }
}

/// Body of `POST /api/commands/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
    #[serde(rename = "type")]
    pub kind: CommandKind,
}

// ============================================================================
// CommandResult
// ============================================================================

/// Outcome of one interpreter, serialized without an outer tag.
///
/// Variant order matters for deserialization: path outcomes carry a `type`
/// tag, shell outcomes carry `stdout`, slash outcomes carry `args`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandResult {
    Path(PathOutput),
    Shell(ShellOutput),
    Slash(SlashOutput),
}

impl CommandResult {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Slash(_) => CommandKind::Slash,
            Self::Path(_) => CommandKind::At,
            Self::Shell(_) => CommandKind::Shell,
        }
    }

    /// True when the payload describes an application-level failure.
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Slash(out) => out.result.unknown,
            Self::Path(out) => matches!(out, PathOutput::Error { .. }),
            Self::Shell(out) => !out.success,
        }
    }
}

// --- Slash ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashOutput {
    /// Command name with the sigil stripped.
    pub command: String,
    pub args: Vec<String>,
    pub result: SlashReply,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashReply {
    pub message: String,
    #[serde(
        rename = "subCommand",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_command: Option<String>,
    /// Set when the name matched no recognized command.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unknown: bool,
}

// --- Path reference ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PathOutput {
    Directory {
        path: String,
        files: Vec<DirEntry>,
    },
    File {
        path: String,
        /// Lowercase, with leading dot; empty when the name has no extension.
        extension: String,
        content: String,
        size: u64,
    },
    Error {
        path: String,
        error: String,
    },
}

impl PathOutput {
    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path, .. } | Self::File { path, .. } | Self::Error { path, .. } => {
                path
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    #[serde(rename = "isDirectory")]
    pub is_directory: bool,
}

// --- Shell ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}
