//! `!command` interpreter.
//!
//! The command runs through the host shell with the host's working directory
//! and environment. There is no sandbox and no timeout: a command that never
//! exits holds its request open indefinitely.

use std::process::ExitStatus;

use interlink_protocol::{CommandKind, ShellOutput};
use tokio::process::Command;
use tracing::{debug, warn};

use super::strip_sigil;

/// Run `!command` to completion and capture its output.
///
/// Nonzero exits and spawn failures are reported in the returned
/// [`ShellOutput`] with `success: false`.
pub async fn process_shell_command(text: &str) -> ShellOutput {
    let command = strip_sigil(text, CommandKind::Shell).to_string();

    match shell(&command).output().await {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            debug!(command = %command, status = %output.status, "Shell command finished");

            let error = (!output.status.success()).then(|| failure_message(&command, output.status));
            ShellOutput {
                command,
                stdout,
                stderr,
                success: error.is_none(),
                error,
            }
        }
        Err(e) => {
            warn!(command = %command, error = %e, "Failed to spawn shell command");
            ShellOutput {
                command,
                stdout: String::new(),
                stderr: String::new(),
                error: Some(e.to_string()),
                success: false,
            }
        }
    }
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

fn failure_message(command: &str, status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("Command failed with exit code {}: {}", code, command),
        None => format!("Command terminated by signal: {}", command),
    }
}
