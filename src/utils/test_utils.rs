use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ChatRequest, Usage};
use crate::core::chat_request::{ChatBackend, ChatError, ChatReply};
use crate::core::controller::ChatController;
use crate::core::credentials::{CredentialResolver, CredentialTable, Credentials};
use crate::core::mode::Mode;
use crate::core::models::ModelId;

/// Table with a distinct fake endpoint and key per model.
pub fn test_table() -> CredentialTable {
    let entries: HashMap<ModelId, Credentials> = ModelId::ALL
        .into_iter()
        .map(|id| {
            (
                id,
                Credentials::new(
                    format!("https://{}.example/chat", id.as_str()),
                    format!("key-{}", id.as_str()),
                ),
            )
        })
        .collect();
    CredentialTable::from_entries(entries).expect("complete table")
}

pub fn test_resolver(model: ModelId) -> CredentialResolver {
    CredentialResolver::new(test_table(), model)
}

pub fn create_test_controller() -> ChatController {
    ChatController::new(test_resolver(ModelId::Gemini20Flash), Mode::None, 0.7)
}

pub fn test_usage() -> Usage {
    Usage {
        prompt_tokens: 10,
        completion_tokens: 5,
        total_tokens: 15,
    }
}

/// Backend that answers from a queue and records what it was sent.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<ChatReply, ChatError>>>,
    requests: Mutex<Vec<(Credentials, ChatRequest)>>,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push(&self, result: Result<ChatReply, ChatError>) {
        self.responses.lock().unwrap().push_back(result);
    }

    pub fn push_reply(&self, content: &str) {
        self.push(Ok(ChatReply::new(content)));
    }

    pub fn requests(&self) -> Vec<(Credentials, ChatRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(
        &self,
        credentials: &Credentials,
        request: &ChatRequest,
    ) -> Result<ChatReply, ChatError> {
        self.requests
            .lock()
            .unwrap()
            .push((credentials.clone(), request.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::MalformedResponse("no scripted response".into())))
    }
}
