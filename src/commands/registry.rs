use super::CommandResult;

pub type CommandHandler = fn(CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands and key bindings.",
        handler: super::handle_help,
    },
    Command {
        name: "mode",
        usage: "/mode [chat|image]",
        help: "Switch between chat and image generation (toggles without an argument).",
        handler: super::handle_mode,
    },
    Command {
        name: "image",
        usage: "/image <path>",
        help: "Attach a png, jpg, jpeg, gif or webp image to the next chat message.",
        handler: super::handle_image,
    },
    Command {
        name: "unimage",
        usage: "/unimage",
        help: "Remove the attached image.",
        handler: super::handle_unimage,
    },
    Command {
        name: "copy",
        usage: "/copy [n]",
        help: "Copy the n-th code block of the latest reply (default: last).",
        handler: super::handle_copy,
    },
    Command {
        name: "export",
        usage: "/export [file]",
        help: "Write the conversation as an HTML page.",
        handler: super::handle_export,
    },
    Command {
        name: "log",
        usage: "/log [file]",
        help: "Start logging the transcript to a file, or pause/resume logging.",
        handler: super::handle_log,
    },
];
