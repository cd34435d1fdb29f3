//! Plain-text rendering of transcript messages for the terminal.

use crate::core::message::{Message, Role};
use crate::core::mode::Mode;
use crate::utils::json::format_json;

fn label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
        Role::System => "System",
    }
}

/// Assistant content as shown to the user; pretty-printed in json mode
/// when it parses.
pub fn format_reply(message: &Message, mode: Mode) -> String {
    if mode == Mode::Json {
        if let Some(pretty) = format_json(&message.content) {
            return pretty;
        }
    }
    message.content.clone()
}

/// `tokens: prompt P, completion C, total T | N ms`, from whatever metadata
/// the message carries.
pub fn format_metadata(message: &Message) -> Option<String> {
    let usage = message.usage.as_ref().map(|usage| {
        format!(
            "tokens: prompt {}, completion {}, total {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        )
    });
    let time = message.time_of_response.map(|ms| format!("{ms} ms"));

    match (usage, time) {
        (Some(usage), Some(time)) => Some(format!("{usage} | {time}")),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

pub fn format_history(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| format!("{}: {}", label(message.role), message.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
