use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::core::chat_request::{ChatBackend, ChatError, ChatReply};
use crate::core::controller::PendingRequest;

/// Outcome of one request, tagged with the id it was dispatched under.
pub type Completion = (u64, Result<ChatReply, ChatError>);

/// Performs the exchange described by `pending` and waits for it.
pub async fn execute(
    backend: &dyn ChatBackend,
    pending: &PendingRequest,
) -> Result<ChatReply, ChatError> {
    backend
        .complete(&pending.credentials, &pending.request)
        .await
}

/// Runs pending requests on background tasks and reports their outcomes on
/// a channel. A request whose cancel token fires reports nothing.
#[derive(Clone)]
pub struct ChatService {
    backend: Arc<dyn ChatBackend>,
    tx: mpsc::UnboundedSender<Completion>,
}

impl ChatService {
    pub fn new(backend: Arc<dyn ChatBackend>) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { backend, tx }, rx)
    }

    pub fn spawn_request(&self, pending: PendingRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let request_id = pending.id;
            tokio::select! {
                result = execute(backend.as_ref(), &pending) => {
                    let _ = tx.send((request_id, result));
                }
                _ = pending.cancel_token.cancelled() => {
                    debug!(request_id, "request cancelled before completion");
                }
            }
        });
    }
}
