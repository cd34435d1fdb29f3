mod registry;

pub use registry::{all_commands, find_command, CommandInvocation};

use crate::cli::render::format_history;
use crate::core::controller::{ChatController, PendingRequest};
use crate::core::mode::Mode;
use crate::core::models::{find_builtin_model, ModelId};

pub enum CommandResult {
    Continue,
    /// Text to show the user; the transcript is unaffected.
    Notice(String),
    /// A request the caller must run and hand back to the controller.
    Dispatch(PendingRequest),
    ProcessAsMessage(String),
    Quit,
}

pub fn process_input(controller: &mut ChatController, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        (command.handler)(controller, CommandInvocation { args })
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

pub fn help_text() -> String {
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    let mut help = String::from("Commands:\n");
    for command in all_commands() {
        help.push_str(&format!("  {:width$}  {}\n", command.usage, command.help));
    }
    help.push_str("Anything else is sent to the model.");
    help
}

const BUSY_NOTICE: &str = "Still waiting for the previous reply. Use /clear to cancel it.";

pub(super) fn handle_help(
    _controller: &mut ChatController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Notice(help_text())
}

pub(super) fn handle_clear(
    controller: &mut ChatController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    controller.clear_chat();
    CommandResult::Notice("Transcript cleared".to_string())
}

pub(super) fn handle_summarize(
    controller: &mut ChatController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    if controller.is_loading() {
        return CommandResult::Notice(BUSY_NOTICE.to_string());
    }
    match controller.summarize_chat() {
        Some(pending) => CommandResult::Dispatch(pending),
        None => CommandResult::Notice("Nothing to summarize yet.".to_string()),
    }
}

pub(super) fn handle_system(
    controller: &mut ChatController,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if controller.send_system_prompt_message(invocation.args) {
        CommandResult::Notice("System instruction added".to_string())
    } else {
        CommandResult::Notice("Usage: /system <text>".to_string())
    }
}

pub(super) fn handle_book(
    controller: &mut ChatController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Dispatch(controller.send_book_first_message())
}

pub(super) fn handle_mode(
    controller: &mut ChatController,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if invocation.args.is_empty() {
        let choices: Vec<&str> = Mode::ALL.iter().map(|mode| mode.as_str()).collect();
        return CommandResult::Notice(format!(
            "Mode: {} (available: {})",
            controller.mode(),
            choices.join(", ")
        ));
    }

    match invocation.args.parse::<Mode>() {
        Ok(mode) => {
            controller.set_mode(mode);
            CommandResult::Notice(format!("Mode set: {mode}"))
        }
        Err(err) => CommandResult::Notice(err.to_string()),
    }
}

pub(super) fn handle_model(
    controller: &mut ChatController,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if invocation.args.is_empty() {
        let mut listing = String::from("Models:");
        for id in ModelId::ALL {
            let marker = if id == controller.model() { "*" } else { " " };
            let name = find_builtin_model(id).map_or("", |model| model.display_name.as_str());
            listing.push_str(&format!("\n {marker} {id}  {name}"));
        }
        return CommandResult::Notice(listing);
    }

    match invocation.args.parse::<ModelId>() {
        Ok(model) => {
            controller.select_model(model);
            let mut notice = format!("Model set: {model}");
            if !controller.credentials().has_key() {
                notice.push_str(" (no API key configured)");
            }
            CommandResult::Notice(notice)
        }
        Err(err) => CommandResult::Notice(err.to_string()),
    }
}

pub(super) fn handle_temperature(
    controller: &mut ChatController,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Notice(format!("Temperature: {}", controller.temperature()));
    }

    match invocation.args.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            controller.set_temperature(value);
            CommandResult::Notice(format!("Temperature set: {value}"))
        }
        _ => CommandResult::Notice(format!(
            "Invalid temperature: {}. Usage: /temperature <number>",
            invocation.args
        )),
    }
}

pub(super) fn handle_history(
    controller: &mut ChatController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    if controller.messages().is_empty() {
        return CommandResult::Notice("The conversation is empty.".to_string());
    }
    CommandResult::Notice(format_history(controller.messages()))
}

pub(super) fn handle_quit(
    _controller: &mut ChatController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Quit
}

#[cfg(test)]
mod tests;
