//! Transcript controller: owns the conversation and reconciles replies.
//!
//! The controller is synchronous. Operations that need the model return a
//! [`PendingRequest`] snapshot; whoever drives the controller executes it
//! (see [`crate::core::chat_service`]) and hands the outcome back through
//! [`ChatController::complete_request`]. Only the most recent request is
//! ever reconciled: a new send is refused while one is outstanding, and
//! clearing the chat cancels the outstanding request and discards its
//! completion if it still arrives.

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::ChatRequest;
use crate::core::chat_request::{build_request, ChatError, ChatReply};
use crate::core::constants::{APOLOGY_MESSAGE, BOOK_OPENER, SUMMARY_ERROR};
use crate::core::credentials::{CredentialResolver, Credentials};
use crate::core::message::Message;
use crate::core::mode::Mode;
use crate::core::models::ModelId;
use crate::core::persistence::TranscriptStore;
use crate::core::transcript::Transcript;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Regular conversation turn; the reply is appended.
    Turn,
    /// Summarization; the reply replaces the transcript.
    Summary,
}

/// Everything needed to perform one exchange, captured at dispatch time.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: u64,
    pub kind: RequestKind,
    pub credentials: Credentials,
    pub request: ChatRequest,
    pub cancel_token: CancellationToken,
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    kind: RequestKind,
    started_at: Instant,
    cancel_token: CancellationToken,
}

pub struct ChatController {
    transcript: Transcript,
    credentials: CredentialResolver,
    mode: Mode,
    temperature: f64,
    error: Option<String>,
    in_flight: Option<InFlight>,
    last_request_id: u64,
    store: Option<Box<dyn TranscriptStore>>,
}

impl ChatController {
    pub fn new(credentials: CredentialResolver, mode: Mode, temperature: f64) -> Self {
        Self {
            transcript: Transcript::new(),
            credentials,
            mode,
            temperature,
            error: None,
            in_flight: None,
            last_request_id: 0,
            store: None,
        }
    }

    /// Attaches a store and resumes the transcript it holds.
    pub fn with_store(mut self, store: Box<dyn TranscriptStore>) -> Self {
        match store.load() {
            Ok(messages) => {
                debug!(count = messages.len(), "restored transcript");
                self.transcript = Transcript::from_messages(messages);
            }
            Err(err) => warn!("failed to load transcript: {err}"),
        }
        self.store = Some(store);
        self
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Not validated here; out-of-range values are left for the endpoint to reject.
    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    pub fn model(&self) -> ModelId {
        self.credentials.model()
    }

    /// Affects only requests dispatched after the switch.
    pub fn select_model(&mut self, model: ModelId) {
        self.credentials.set_credentials(model);
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials.get_credentials()
    }

    /// Appends a user turn and starts a request for it.
    ///
    /// Returns `None` without touching any state when the text is blank or a
    /// request is already outstanding.
    pub fn send_message(&mut self, text: &str) -> Option<PendingRequest> {
        let content = text.trim();
        if content.is_empty() {
            return None;
        }
        if self.is_loading() {
            debug!("send rejected: a request is already in flight");
            return None;
        }

        self.push_message(Message::user(content));
        Some(self.begin_request(RequestKind::Turn))
    }

    /// Appends a system turn locally. Never calls the model.
    pub fn send_system_prompt_message(&mut self, text: &str) -> bool {
        let content = text.trim();
        if content.is_empty() {
            return false;
        }

        self.push_message(Message::system(content));
        debug!(
            system_messages = self.messages().iter().filter(|m| m.is_system()).count(),
            "added system message"
        );
        true
    }

    /// Starts over with the guided book-recommendation opener.
    pub fn send_book_first_message(&mut self) -> PendingRequest {
        self.clear_chat();
        self.push_message(Message::user(BOOK_OPENER));
        self.begin_request(RequestKind::Turn)
    }

    /// Requests a summary of the user/assistant turns.
    ///
    /// Returns `None` when there is nothing to summarize or a request is
    /// already outstanding.
    pub fn summarize_chat(&mut self) -> Option<PendingRequest> {
        if self.transcript.is_empty() {
            return None;
        }
        if self.is_loading() {
            debug!("summarize rejected: a request is already in flight");
            return None;
        }

        let prompt = [self.transcript.summary_request()];
        Some(self.start_request(
            RequestKind::Summary,
            build_request(&prompt, Mode::None, 0.0),
        ))
    }

    pub fn clear_chat(&mut self) {
        self.cancel_in_flight();
        self.transcript.clear();
        self.error = None;
        if let Some(store) = &self.store {
            if let Err(err) = store.clear() {
                warn!("failed to clear stored transcript: {err}");
            }
        }
    }

    /// Cancels the outstanding request, if any. Its completion will be discarded.
    pub fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(request_id = in_flight.id, "cancelling request");
            in_flight.cancel_token.cancel();
        }
    }

    /// Reconciles the outcome of request `id`.
    ///
    /// Returns `false` when the outcome was stale (cleared, cancelled or
    /// superseded) and was dropped without touching the transcript.
    pub fn complete_request(&mut self, id: u64, result: Result<ChatReply, ChatError>) -> bool {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.id == id => in_flight,
            other => {
                self.in_flight = other;
                debug!(request_id = id, "discarding stale completion");
                return false;
            }
        };

        let elapsed_ms =
            u64::try_from(in_flight.started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

        match (in_flight.kind, result) {
            (RequestKind::Turn, Ok(reply)) => {
                info!(request_id = id, elapsed_ms, "reply received");
                // metadata is attached before the push, so the message is
                // never observable without it
                self.push_message(Message::assistant_reply(
                    reply.content,
                    reply.usage,
                    elapsed_ms,
                ));
            }
            (RequestKind::Turn, Err(err)) => {
                warn!(request_id = id, "chat request failed: {err}");
                self.error = Some(err.user_message().to_string());
                self.push_message(Message::assistant(APOLOGY_MESSAGE));
            }
            (RequestKind::Summary, Ok(reply)) => {
                info!(request_id = id, elapsed_ms, "conversation summarized");
                self.transcript.replace_with_summary(&reply.content);
                self.persist();
            }
            (RequestKind::Summary, Err(err)) => {
                warn!(request_id = id, "summarization failed: {err}");
                self.error = Some(SUMMARY_ERROR.to_string());
            }
        }

        true
    }

    fn begin_request(&mut self, kind: RequestKind) -> PendingRequest {
        let request = build_request(self.transcript.messages(), self.mode, self.temperature);
        self.start_request(kind, request)
    }

    fn start_request(&mut self, kind: RequestKind, request: ChatRequest) -> PendingRequest {
        self.error = None;
        self.last_request_id += 1;
        let id = self.last_request_id;
        let cancel_token = CancellationToken::new();

        self.in_flight = Some(InFlight {
            id,
            kind,
            started_at: Instant::now(),
            cancel_token: cancel_token.clone(),
        });

        debug!(request_id = id, ?kind, model = %self.model(), "dispatching request");

        PendingRequest {
            id,
            kind,
            credentials: self.credentials.get_credentials(),
            request,
            cancel_token,
        }
    }

    fn push_message(&mut self, message: Message) {
        self.transcript.push(message);
        self.persist();
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save(self.transcript.messages()) {
                warn!("failed to save transcript: {err}");
            }
        }
    }
}
