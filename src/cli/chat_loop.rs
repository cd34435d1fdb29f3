//! Interactive line-oriented chat loop.
//!
//! Reads input lines and request completions concurrently, so `/clear`
//! stays responsive while a reply is outstanding. When input ends or the
//! user quits, an outstanding reply is still awaited and reconciled before
//! the loop returns, so the transcript never ends on an unanswered turn.

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::cli::render::{format_metadata, format_reply};
use crate::commands::{process_input, CommandResult};
use crate::core::chat_request::ChatBackend;
use crate::core::chat_service::ChatService;
use crate::core::controller::{ChatController, PendingRequest, RequestKind};

const PROMPT: &str = "> ";

pub async fn run_chat(
    controller: ChatController,
    backend: Arc<dyn ChatBackend>,
) -> Result<(), Box<dyn Error>> {
    let input = BufReader::new(tokio::io::stdin());
    chat_session(controller, backend, input, &mut io::stdout()).await?;
    Ok(())
}

/// Runs the loop over `input` until it ends or the user quits, writing
/// replies and notices to `out`. Returns the controller for inspection.
pub async fn chat_session<R, W>(
    mut controller: ChatController,
    backend: Arc<dyn ChatBackend>,
    input: R,
    out: &mut W,
) -> Result<ChatController, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (service, mut rx) = ChatService::new(backend);
    let mut lines = input.lines();
    let mut outstanding: Option<(u64, RequestKind)> = None;
    let mut reading = true;

    writeln!(
        out,
        "chatlet: {} (mode {}, temperature {}). Type /help for commands.",
        controller.model(),
        controller.mode(),
        controller.temperature()
    )?;
    if !controller.messages().is_empty() {
        writeln!(
            out,
            "Resumed a conversation of {} messages. Use /history to review it or /clear to start over.",
            controller.messages().len()
        )?;
    }
    prompt(out)?;

    loop {
        if !reading && !controller.is_loading() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if reading => {
                let Some(line) = line? else {
                    debug!(pending = controller.is_loading(), "input closed");
                    reading = false;
                    continue;
                };
                let dispatched = match process_input(&mut controller, &line) {
                    CommandResult::Continue => None,
                    CommandResult::Notice(text) => {
                        writeln!(out, "{text}")?;
                        None
                    }
                    CommandResult::Dispatch(pending) => Some(pending),
                    CommandResult::ProcessAsMessage(text) => {
                        if controller.is_loading() {
                            writeln!(out, "Still waiting for the previous reply. Use /clear to cancel it.")?;
                        }
                        controller.send_message(&text)
                    }
                    CommandResult::Quit => {
                        reading = false;
                        None
                    }
                };

                if let Some(pending) = dispatched {
                    outstanding = Some((pending.id, pending.kind));
                    dispatch(&service, pending, out)?;
                } else if reading && !controller.is_loading() {
                    prompt(out)?;
                }
            }
            Some((id, result)) = rx.recv() => {
                if !controller.complete_request(id, result) {
                    continue;
                }
                if let Some((_, kind)) = outstanding.take().filter(|(sent, _)| *sent == id) {
                    render_completion(&controller, kind, out)?;
                }
                if reading {
                    prompt(out)?;
                }
            }
        }
    }

    Ok(controller)
}

fn dispatch<W: Write>(
    service: &ChatService,
    pending: PendingRequest,
    out: &mut W,
) -> io::Result<()> {
    debug!(request_id = pending.id, "waiting for reply");
    writeln!(out, "...")?;
    service.spawn_request(pending);
    Ok(())
}

fn render_completion<W: Write>(
    controller: &ChatController,
    kind: RequestKind,
    out: &mut W,
) -> io::Result<()> {
    if let Some(error) = controller.error() {
        eprintln!("⚠️  {error}");
    }

    match kind {
        RequestKind::Turn => {
            if let Some(reply) = controller.messages().last() {
                writeln!(out, "{}", format_reply(reply, controller.mode()))?;
                if let Some(metadata) = format_metadata(reply) {
                    writeln!(out, "  [{metadata}]")?;
                }
            }
        }
        RequestKind::Summary => {
            if controller.error().is_none() {
                if let Some(summary) = controller.messages().first() {
                    writeln!(out, "Conversation summarized:")?;
                    writeln!(out, "{}", summary.content)?;
                }
            }
        }
    }
    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "{PROMPT}")?;
    out.flush()
}
