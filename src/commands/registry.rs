use super::CommandResult;
use crate::core::controller::ChatController;

pub type CommandHandler = fn(&mut ChatController, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
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
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Start a new conversation, cancelling any pending reply.",
        handler: super::handle_clear,
    },
    Command {
        name: "summarize",
        usage: "/summarize",
        help: "Replace the conversation with a short summary.",
        handler: super::handle_summarize,
    },
    Command {
        name: "system",
        usage: "/system <text>",
        help: "Add a system instruction without contacting the model.",
        handler: super::handle_system,
    },
    Command {
        name: "book",
        usage: "/book",
        help: "Start over with a guided book recommendation.",
        handler: super::handle_book,
    },
    Command {
        name: "mode",
        usage: "/mode [none|book|json]",
        help: "Show or change the conversation mode.",
        handler: super::handle_mode,
    },
    Command {
        name: "model",
        usage: "/model [id]",
        help: "Show the available models or switch models.",
        handler: super::handle_model,
    },
    Command {
        name: "temperature",
        usage: "/temperature [value]",
        help: "Show or change the sampling temperature.",
        handler: super::handle_temperature,
    },
    Command {
        name: "history",
        usage: "/history",
        help: "Print the conversation so far.",
        handler: super::handle_history,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave chatlet.",
        handler: super::handle_quit,
    },
    Command {
        name: "exit",
        usage: "/exit",
        help: "Same as /quit.",
        handler: super::handle_quit,
    },
];
