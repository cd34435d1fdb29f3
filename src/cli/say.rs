//! One-shot "say" command

use std::error::Error;
use std::sync::Arc;

use crate::cli::render::{format_metadata, format_reply};
use crate::core::chat_request::ChatBackend;
use crate::core::chat_service::execute;
use crate::core::controller::ChatController;

pub async fn run_say(
    prompt: &[String],
    mut controller: ChatController,
    backend: Arc<dyn ChatBackend>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    let Some(pending) = controller.send_message(&prompt) else {
        eprintln!("Usage: chatlet say <prompt>");
        std::process::exit(1);
    };

    let result = execute(backend.as_ref(), &pending).await;
    controller.complete_request(pending.id, result);

    if let Some(error) = controller.error() {
        eprintln!("❌ Error: {error}");
        std::process::exit(1);
    }

    if let Some(reply) = controller.messages().last() {
        println!("{}", format_reply(reply, controller.mode()));
        if let Some(metadata) = format_metadata(reply) {
            eprintln!("[{metadata}]");
        }
    }

    Ok(())
}
