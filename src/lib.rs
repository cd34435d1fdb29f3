//! Chatlet is a terminal chat client for OpenAI-compatible chat-completions
//! endpoints.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript controller, per-model credentials, request
//!   building, dispatch, configuration and transcript persistence.
//! - [`commands`] implements slash-command parsing and execution for the
//!   interactive loop.
//! - [`cli`] parses arguments and runs the REPL and one-shot commands.
//! - [`api`] defines the chat-completions payloads.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod utils;
