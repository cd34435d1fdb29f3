//! Outbound request construction and the single request/response exchange.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::api::{ChatMessage, ChatRequest, ChatResponse, Usage};
use crate::core::constants::{CONTEXT_LENGTH_ERROR, GENERIC_ERROR, UNAUTHORIZED_ERROR};
use crate::core::credentials::Credentials;
use crate::core::message::{Message, Role};
use crate::core::mode::Mode;

const CONTEXT_LENGTH_MARKERS: &[&str] = &[
    "context length",
    "context_length_exceeded",
    "maximum context",
    "input too long",
    "too many tokens",
];

/// Assistant reply extracted from a successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub content: String,
    pub usage: Option<Usage>,
}

impl ChatReply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}

#[derive(Debug)]
pub enum ChatError {
    /// The conversation no longer fits the model's token budget.
    ContextLengthExceeded(String),
    /// HTTP 401 from the endpoint.
    Unauthorized,
    /// Any other unsuccessful status, or an error object in a 2xx body.
    Http { status: u16, message: String },
    Network(reqwest::Error),
    MalformedResponse(String),
}

impl ChatError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::ContextLengthExceeded(_) => CONTEXT_LENGTH_ERROR,
            ChatError::Unauthorized => UNAUTHORIZED_ERROR,
            ChatError::Http { .. } | ChatError::Network(_) | ChatError::MalformedResponse(_) => {
                GENERIC_ERROR
            }
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::ContextLengthExceeded(detail) => {
                write!(f, "context length exceeded: {detail}")
            }
            ChatError::Unauthorized => write!(f, "unauthorized (HTTP 401)"),
            ChatError::Http { status, message } => write!(f, "HTTP {status}: {message}"),
            ChatError::Network(err) => write!(f, "network error: {err}"),
            ChatError::MalformedResponse(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChatError::Network(err) => Some(err),
            _ => None,
        }
    }
}

/// Transport seam for a single chat-completions exchange.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(
        &self,
        credentials: &Credentials,
        request: &ChatRequest,
    ) -> Result<ChatReply, ChatError>;
}

/// Transcript as sent to the model, with the mode instruction (if any)
/// appended last. The transcript itself is left untouched.
pub fn build_outbound_messages(transcript: &[Message], mode: Mode) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = transcript.iter().map(Message::to_api).collect();
    if let Some(instruction) = mode.system_instruction() {
        messages.push(ChatMessage::new(Role::System.as_str(), instruction));
    }
    messages
}

pub fn build_request(transcript: &[Message], mode: Mode, temperature: f64) -> ChatRequest {
    ChatRequest {
        messages: build_outbound_messages(transcript, mode),
        temperature,
    }
}

/// One best-effort exchange: no retries, no backoff.
pub async fn send_message(
    backend: &dyn ChatBackend,
    credentials: &Credentials,
    transcript: &[Message],
    mode: Mode,
    temperature: f64,
) -> Result<ChatReply, ChatError> {
    let request = build_request(transcript, mode, temperature);
    backend.complete(credentials, &request).await
}

#[derive(Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(
        &self,
        credentials: &Credentials,
        request: &ChatRequest,
    ) -> Result<ChatReply, ChatError> {
        debug!(
            api_url = %credentials.api_url,
            messages = request.messages.len(),
            temperature = request.temperature,
            "sending chat request"
        );

        let response = self
            .client
            .post(&credentials.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", credentials.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(ChatError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(ChatError::Network)?;

        if !status.is_success() {
            let err = classify_failure(status, &body);
            debug!(%status, "chat request failed: {}", format_api_error(&body));
            return Err(err);
        }

        parse_reply(&body)
    }
}

fn classify_failure(status: StatusCode, body: &str) -> ChatError {
    if is_context_length_error(body) {
        return ChatError::ContextLengthExceeded(error_summary(body));
    }
    if status == StatusCode::UNAUTHORIZED {
        return ChatError::Unauthorized;
    }
    ChatError::Http {
        status: status.as_u16(),
        message: error_summary(body),
    }
}

fn parse_reply(body: &str) -> Result<ChatReply, ChatError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| ChatError::MalformedResponse(format!("invalid JSON: {err}")))?;

    // some gateways report failures inside a 200 response
    if value.get("error").is_some_and(|error| !error.is_null()) {
        if is_context_length_error(body) {
            return Err(ChatError::ContextLengthExceeded(error_summary(body)));
        }
        return Err(ChatError::Http {
            status: StatusCode::OK.as_u16(),
            message: error_summary(body),
        });
    }

    let response: ChatResponse = serde_json::from_value(value)
        .map_err(|err| ChatError::MalformedResponse(err.to_string()))?;
    let content = response.first_content().ok_or_else(|| {
        ChatError::MalformedResponse("missing choices[0].message.content".to_string())
    })?;

    Ok(ChatReply {
        content: content.to_string(),
        usage: response.usage,
    })
}

pub fn is_context_length_error(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    CONTEXT_LENGTH_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

fn error_summary(body: &str) -> String {
    serde_json::from_str::<Value>(body.trim())
        .ok()
        .and_then(|value| extract_error_summary(&value))
        .filter(|summary| !summary.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

fn extract_error_summary(value: &Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Readable rendering of an error body for logs.
pub fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error: <empty>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            return match extract_error_summary(&json_value) {
                Some(summary) if !summary.is_empty() => {
                    format!("API Error: {summary}\n{pretty_json}")
                }
                _ => format!("API Error:\n{pretty_json}"),
            };
        }
    }

    format!("API Error: {trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript() -> Vec<Message> {
        vec![Message::user("hi"), Message::assistant_reply("hello", None, 12)]
    }

    #[test]
    fn outbound_messages_append_mode_instruction_last() {
        let history = transcript();
        let outbound = build_outbound_messages(&history, Mode::Json);

        assert_eq!(outbound.len(), 3);
        assert_eq!(outbound[0], ChatMessage::new("user", "hi"));
        assert_eq!(outbound[1], ChatMessage::new("assistant", "hello"));
        assert_eq!(outbound[2].role, "system");
        assert_eq!(Some(outbound[2].content.as_str()), Mode::Json.system_instruction());
        // the caller's transcript is not touched
        assert_eq!(history, transcript());
    }

    #[test]
    fn no_mode_sends_transcript_verbatim() {
        let request = build_request(&transcript(), Mode::None, 1.5);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.temperature, 1.5);
    }

    #[test]
    fn context_length_markers_are_case_insensitive() {
        assert!(is_context_length_error(
            "This model's maximum context length is 128000 tokens"
        ));
        assert!(is_context_length_error(r#"{"error":{"code":"context_length_exceeded"}}"#));
        assert!(is_context_length_error("Input too long for requested model"));
        assert!(!is_context_length_error("rate limit reached"));
    }

    #[test]
    fn failures_classify_context_before_status() {
        let body = r#"{"error":{"message":"Please reduce the context length of your messages"}}"#;
        let err = classify_failure(StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, ChatError::ContextLengthExceeded(ref detail)
            if detail == "Please reduce the context length of your messages"));
        assert_eq!(err.user_message(), CONTEXT_LENGTH_ERROR);

        let err = classify_failure(StatusCode::UNAUTHORIZED, r#"{"error":"bad key"}"#);
        assert!(matches!(err, ChatError::Unauthorized));

        let err = classify_failure(StatusCode::BAD_GATEWAY, "upstream down");
        match err {
            ChatError::Http { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_reply_requires_first_choice_content() {
        let reply = parse_reply(
            r#"{"choices":[{"message":{"role":"assistant","content":"hey"}}],
                "usage":{"prompt_tokens":1,"completion_tokens":2,"total_tokens":3}}"#,
        )
        .expect("reply");
        assert_eq!(reply.content, "hey");
        assert_eq!(reply.usage.map(|u| u.total_tokens), Some(3));

        assert!(matches!(
            parse_reply(r#"{"choices":[]}"#),
            Err(ChatError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_reply("<html>"),
            Err(ChatError::MalformedResponse(_))
        ));
    }

    #[test]
    fn error_objects_in_success_bodies_are_failures() {
        let err = parse_reply(r#"{"error":{"message":"Input too long"}}"#).unwrap_err();
        assert!(matches!(err, ChatError::ContextLengthExceeded(_)));

        let err = parse_reply(r#"{"error":{"message":"quota"}}"#).unwrap_err();
        assert!(matches!(err, ChatError::Http { status: 200, .. }));
    }

    #[test]
    fn format_api_error_prettifies_json_with_summary() {
        let raw = r#"{"error":{"message":"model   overloaded"}}"#;
        let expected = r#"API Error: model overloaded
{
  "error": {
    "message": "model   overloaded"
  }
}"#;
        assert_eq!(format_api_error(raw), expected);
        assert_eq!(format_api_error("  plain failure "), "API Error: plain failure");
        assert_eq!(format_api_error(""), "API Error: <empty>");
    }

    fn backend() -> HttpChatBackend {
        HttpChatBackend::new(Duration::from_secs(5)).expect("client")
    }

    #[tokio::test]
    async fn http_backend_posts_bearer_auth_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.5
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}}],
                    "usage":{"prompt_tokens":5,"completion_tokens":2,"total_tokens":7}}"#,
            )
            .create_async()
            .await;

        let credentials = Credentials::new(format!("{}/v1/chat/completions", server.url()), "sk-test");
        let reply = send_message(
            &backend(),
            &credentials,
            &[Message::user("hi")],
            Mode::None,
            0.5,
        )
        .await
        .expect("reply");

        mock.assert_async().await;
        assert_eq!(reply.content, "Hello!");
        assert_eq!(
            reply.usage,
            Some(Usage {
                prompt_tokens: 5,
                completion_tokens: 2,
                total_tokens: 7
            })
        );
    }

    #[tokio::test]
    async fn http_backend_maps_401_to_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let credentials = Credentials::new(format!("{}/chat", server.url()), "");
        let err = backend()
            .complete(
                &credentials,
                &build_request(&[Message::user("hi")], Mode::None, 0.7),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Unauthorized));
    }

    #[tokio::test]
    async fn http_backend_maps_context_errors_from_400() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat")
            .with_status(400)
            .with_body(r#"{"error":{"message":"This model's maximum context length is 131072 tokens"}}"#)
            .create_async()
            .await;

        let credentials = Credentials::new(format!("{}/chat", server.url()), "sk");
        let err = backend()
            .complete(
                &credentials,
                &build_request(&[Message::user("long")], Mode::None, 0.7),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::ContextLengthExceeded(_)));
    }

    #[tokio::test]
    async fn http_backend_reports_network_failures() {
        // nothing listens on the discard port
        let credentials = Credentials::new("http://127.0.0.1:9/chat", "sk");
        let err = backend()
            .complete(
                &credentials,
                &build_request(&[Message::user("hi")], Mode::None, 0.7),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Network(_)));
        assert_eq!(err.user_message(), GENERIC_ERROR);
    }
}
