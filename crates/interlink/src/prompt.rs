//! Prompt-builder and ambient-environment collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// Collaborator traits
// ============================================================================

/// Sections the caller wants included in the built prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptOptions {
    pub include_git_info: bool,
    pub include_sandbox_status: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            include_git_info: true,
            include_sandbox_status: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to build system prompt: {0}")]
    Build(String),
}

/// Assembles the system prompt for the calling runtime.
#[async_trait]
pub trait PromptBuilder: Send + Sync {
    async fn build(&self, options: PromptOptions) -> Result<String, PromptError>;
}

/// Branch, status and sandbox flag of the host, read at call time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    pub branch: String,
    pub status: String,
    pub sandbox: bool,
}

/// Read-only view of the host's execution environment.
pub trait AmbientEnvironment: Send + Sync {
    fn snapshot(&self) -> EnvironmentSnapshot;
}

// ============================================================================
// ProcessEnvironment
// ============================================================================

/// Reads `GIT_BRANCH`, `GIT_STATUS` and `SANDBOX_ENABLED` from the process
/// environment on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl AmbientEnvironment for ProcessEnvironment {
    fn snapshot(&self) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            branch: std::env::var("GIT_BRANCH").unwrap_or_default(),
            status: std::env::var("GIT_STATUS").unwrap_or_default(),
            sandbox: std::env::var("SANDBOX_ENABLED").is_ok_and(|v| v == "true"),
        }
    }
}

/// A fixed snapshot, for hosts that resolve the environment up front.
impl AmbientEnvironment for EnvironmentSnapshot {
    fn snapshot(&self) -> EnvironmentSnapshot {
        self.clone()
    }
}

// ============================================================================
// SystemPromptBuilder
// ============================================================================

/// Preamble rendered before every optional section.
pub const SYSTEM_PREAMBLE: &str = "You are Gemini, a helpful AI assistant.";

/// Default prompt builder: preamble plus git and sandbox sections.
pub struct SystemPromptBuilder {
    environment: Arc<dyn AmbientEnvironment>,
}

impl SystemPromptBuilder {
    pub fn new(environment: Arc<dyn AmbientEnvironment>) -> Self {
        Self { environment }
    }
}

#[async_trait]
impl PromptBuilder for SystemPromptBuilder {
    async fn build(&self, options: PromptOptions) -> Result<String, PromptError> {
        let env = self.environment.snapshot();
        let mut prompt = SYSTEM_PREAMBLE.to_string();

        if options.include_git_info {
            let branch = if env.branch.is_empty() {
                "unknown"
            } else {
                &env.branch
            };
            prompt.push_str(&format!("\n\nCurrent git branch: {}", branch));
            if !env.status.is_empty() {
                prompt.push_str(&format!("\nGit status: {}", env.status));
            }
        }

        if options.include_sandbox_status {
            let mode = if env.sandbox { "enabled" } else { "disabled" };
            prompt.push_str(&format!("\n\nSandbox mode: {}", mode));
        }

        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(branch: &str, status: &str, sandbox: bool) -> SystemPromptBuilder {
        SystemPromptBuilder::new(Arc::new(EnvironmentSnapshot {
            branch: branch.to_string(),
            status: status.to_string(),
            sandbox,
        }))
    }

    #[tokio::test]
    async fn full_prompt() {
        let prompt = builder("main", "clean", false)
            .build(PromptOptions::default())
            .await
            .unwrap();
        assert_eq!(
            prompt,
            "You are Gemini, a helpful AI assistant.\n\n\
             Current git branch: main\n\
             Git status: clean\n\n\
             Sandbox mode: disabled"
        );
    }

    #[tokio::test]
    async fn unknown_branch_and_no_status() {
        let prompt = builder("", "", true)
            .build(PromptOptions::default())
            .await
            .unwrap();
        assert!(prompt.contains("Current git branch: unknown"));
        assert!(!prompt.contains("Git status"));
        assert!(prompt.ends_with("Sandbox mode: enabled"));
    }

    #[tokio::test]
    async fn sections_follow_options() {
        let prompt = builder("dev", "dirty", true)
            .build(PromptOptions {
                include_git_info: false,
                include_sandbox_status: false,
            })
            .await
            .unwrap();
        assert_eq!(prompt, SYSTEM_PREAMBLE);
    }
}
