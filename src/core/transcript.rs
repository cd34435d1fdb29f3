use crate::core::constants::{SUMMARY_INSTRUCTION, SUMMARY_PREFIX};
use crate::core::message::Message;

/// Ordered conversation history. Insertion order is the order sent to the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Replaces the whole history with a single summary system message.
    pub fn replace_with_summary(&mut self, summary: &str) {
        self.messages = vec![Message::system(format!("{SUMMARY_PREFIX}{summary}"))];
    }

    /// User and assistant turns rendered as `Label: content`, separated by
    /// blank lines. System turns are left out.
    pub fn dialogue(&self) -> String {
        self.messages
            .iter()
            .filter_map(|message| {
                message
                    .role
                    .dialogue_label()
                    .map(|label| format!("{label}: {}", message.content))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Single user message asking the model to summarize this transcript.
    pub fn summary_request(&self) -> Message {
        Message::user(format!("{SUMMARY_INSTRUCTION}{}", self.dialogue()))
    }
}
