//! Slash command interpreter.

use interlink_protocol::{CommandKind, SlashOutput, SlashReply};

use super::strip_sigil;

/// A recognized slash command.
pub struct SlashCommand {
    pub name: &'static str,
    reply: fn(&[String]) -> SlashReply,
}

/// Recognized commands, in the order `/help` lists them.
pub const SLASH_COMMANDS: &[SlashCommand] = &[
    SlashCommand {
        name: "help",
        reply: help,
    },
    SlashCommand {
        name: "clear",
        reply: |_| message("Conversation cleared"),
    },
    SlashCommand {
        name: "memory",
        reply: |args| with_sub_command("Memory command processed", args, Some("show")),
    },
    SlashCommand {
        name: "chat",
        reply: |args| with_sub_command("Chat command processed", args, Some("list")),
    },
    SlashCommand {
        name: "restore",
        reply: |args| with_sub_command("Restore command processed", args, None),
    },
    SlashCommand {
        name: "compress",
        reply: |_| message("Compress command processed"),
    },
    SlashCommand {
        name: "stats",
        reply: |_| message("Stats command processed"),
    },
];

/// Interpret `/name arg1 arg2 ...`.
pub fn process_slash_command(text: &str) -> SlashOutput {
    let mut parts = strip_sigil(text, CommandKind::Slash).split_whitespace();
    let name = parts.next().unwrap_or_default().to_string();
    let args: Vec<String> = parts.map(String::from).collect();

    let result = match SLASH_COMMANDS.iter().find(|c| c.name == name) {
        Some(command) => (command.reply)(&args),
        None => SlashReply {
            message: format!("Unknown command: {}", name),
            sub_command: None,
            unknown: true,
        },
    };

    SlashOutput {
        command: name,
        args,
        result,
    }
}

fn help(_: &[String]) -> SlashReply {
    let names: Vec<String> = SLASH_COMMANDS
        .iter()
        .map(|c| format!("/{}", c.name))
        .collect();
    message(&format!("Available commands: {}", names.join(", ")))
}

fn message(text: &str) -> SlashReply {
    SlashReply {
        message: text.to_string(),
        sub_command: None,
        unknown: false,
    }
}

fn with_sub_command(text: &str, args: &[String], default: Option<&str>) -> SlashReply {
    SlashReply {
        sub_command: args.first().map(String::as_str).or(default).map(String::from),
        ..message(text)
    }
}
