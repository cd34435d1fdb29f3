//! Wire payloads for OpenAI-compatible chat-completions endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Outbound request body. The endpoint selects the model, so no `model`
/// field is sent.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

/// Token accounting returned alongside a completion.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

#[derive(Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    pub message: ChatResponseMessage,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatResponseChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Text of `choices[0].message.content`, if the response has one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_messages_and_temperature_only() {
        let request = ChatRequest {
            messages: vec![ChatMessage::new("user", "hi")],
            temperature: 0.7,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"messages":[{"role":"user","content":"hi"}],"temperature":0.7}"#
        );
    }

    #[test]
    fn response_without_usage_parses() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.first_content(), Some("hello"));
        assert!(response.usage.is_none());
    }

    #[test]
    fn partial_usage_defaults_missing_counts() {
        let raw = r#"{"choices":[],"usage":{"total_tokens":12}}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.first_content(), None);
        assert_eq!(
            response.usage,
            Some(Usage {
                prompt_tokens: 0,
                completion_tokens: 0,
                total_tokens: 12
            })
        );
    }
}
