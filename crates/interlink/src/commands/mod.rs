//! Command interpreters.
//!
//! Three stateless interpreters, one per [`CommandKind`]:
//!
//! - **slash** (`/name args...`): canned replies for a fixed command table
//! - **at** (`@path`): file content or one-level directory listing
//! - **shell** (`!command`): runs the command through the host shell
//!
//! The caller declares the kind; nothing is inferred from the text. Sigils
//! are stripped leniently: text without the sigil is taken as already stripped.
//! Every outcome, including "unknown command" or "file not found", is a
//! successful [`CommandResult`].

mod path;
mod shell;
mod slash;

use interlink_protocol::{CommandKind, CommandResult};

pub use path::process_at_command;
pub use shell::process_shell_command;
pub use slash::{SLASH_COMMANDS, process_slash_command};

/// Run `text` through the interpreter selected by `kind`.
pub async fn interpret(kind: CommandKind, text: &str) -> CommandResult {
    match kind {
        CommandKind::Slash => CommandResult::Slash(process_slash_command(text)),
        CommandKind::At => CommandResult::Path(process_at_command(text).await),
        CommandKind::Shell => CommandResult::Shell(process_shell_command(text).await),
    }
}

fn strip_sigil(text: &str, kind: CommandKind) -> &str {
    text.strip_prefix(kind.sigil()).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_sigil_is_lenient() {
        assert_eq!(strip_sigil("/help", CommandKind::Slash), "help");
        assert_eq!(strip_sigil("help", CommandKind::Slash), "help");
        assert_eq!(strip_sigil("@/tmp", CommandKind::At), "/tmp");
        // Only the declared kind's sigil is stripped.
        assert_eq!(strip_sigil("!ls", CommandKind::Slash), "!ls");
    }

    #[tokio::test]
    async fn interpret_dispatches_by_declared_kind() {
        // "@help" under the slash interpreter is a slash command named "@help".
        let result = interpret(CommandKind::Slash, "@help").await;
        let CommandResult::Slash(out) = result else {
            panic!("expected slash result");
        };
        assert_eq!(out.command, "@help");
        assert!(out.result.unknown);
    }
}
