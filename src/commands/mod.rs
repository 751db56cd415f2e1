//! Slash commands typed into the prompt. Each command only translates its
//! arguments into [`AppAction`]s; the controller does the rest.

mod registry;

pub use registry::{all_commands, CommandInvocation};

use crate::core::app::AppAction;
use crate::core::mode::Mode;

pub enum CommandResult {
    Actions(Vec<AppAction>),
    ProcessAsMessage(String),
}

pub fn process_input(input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation {
            input: trimmed,
            args,
        };
        (command.handler)(invocation)
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

/// Help text shown by `/help`.
pub fn help_text() -> String {
    let mut help = String::from(
        "Keys\n\
         \x20 Enter          Send\n\
         \x20 Alt+Enter      New line\n\
         \x20 F2 / F3        Chat mode / Image generation mode\n\
         \x20 Ctrl+Y         Copy the last code block\n\
         \x20 Esc            Cancel the pending request, close this help\n\
         \x20 PgUp/PgDn      Scroll the conversation\n\
         \x20 Ctrl+C         Quit\n\
         \nCommands\n",
    );
    for command in all_commands() {
        help.push_str(&format!("  {:<20} {}\n", command.usage, command.help));
    }
    help
}

fn status(message: impl Into<String>) -> CommandResult {
    CommandResult::Actions(vec![AppAction::SetStatus {
        message: message.into(),
    }])
}

pub(super) fn handle_help(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Actions(vec![AppAction::ShowHelp])
}

pub(super) fn handle_mode(invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Actions(vec![AppAction::ToggleMode]);
    }
    match invocation.args.parse::<Mode>() {
        Ok(mode) => CommandResult::Actions(vec![AppAction::SwitchMode { mode }]),
        Err(e) => status(e),
    }
}

pub(super) fn handle_image(invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return status("Usage: /image <path>");
    }
    CommandResult::Actions(vec![AppAction::StageImage {
        path: invocation.args.to_string(),
    }])
}

pub(super) fn handle_unimage(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Actions(vec![AppAction::ClearImage])
}

pub(super) fn handle_copy(invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Actions(vec![AppAction::CopyCodeBlock { index: None }]);
    }
    match invocation.args.parse::<usize>() {
        Ok(n) if n > 0 => CommandResult::Actions(vec![AppAction::CopyCodeBlock {
            index: Some(n - 1),
        }]),
        _ => status("Usage: /copy [n] (n starts at 1)"),
    }
}

pub(super) fn handle_export(invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.input.split_whitespace().collect();
    match parts.len() {
        1 => CommandResult::Actions(vec![AppAction::ExportTranscript { filename: None }]),
        2 => CommandResult::Actions(vec![AppAction::ExportTranscript {
            filename: Some(parts[1].to_string()),
        }]),
        _ => status("Usage: /export [file]"),
    }
}

pub(super) fn handle_log(invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.input.split_whitespace().collect();
    match parts.len() {
        1 => CommandResult::Actions(vec![AppAction::ToggleLogging { filename: None }]),
        2 => CommandResult::Actions(vec![AppAction::ToggleLogging {
            filename: Some(parts[1].to_string()),
        }]),
        _ => status("Usage: /log [filename]"),
    }
}
