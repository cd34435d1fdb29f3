//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat_loop;
pub mod model_list;
pub mod render;
pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, warn};

use crate::cli::chat_loop::run_chat;
use crate::cli::model_list::list_models;
use crate::cli::say::run_say;
use crate::cli::settings::{SettingError, SettingRegistry};
use crate::core::chat_request::{ChatBackend, HttpChatBackend};
use crate::core::config::Config;
use crate::core::controller::ChatController;
use crate::core::credentials::{CredentialResolver, CredentialTable};
use crate::core::mode::Mode;
use crate::core::models::ModelId;
use crate::core::persistence::FileTranscriptStore;
use crate::utils::logging::init_tracing;

const GIT_DESCRIBE: &str = match option_env!("VERGEN_GIT_DESCRIBE") {
    Some(describe) => describe,
    None => "unknown",
};

#[derive(Parser)]
#[command(name = "chatlet")]
#[command(version, long_version = GIT_DESCRIBE)]
#[command(about = "A terminal chat client for OpenAI-compatible chat-completions endpoints")]
#[command(
    long_about = "Chatlet is a line-oriented chat client. It keeps one conversation, sends it \
to the selected model's chat-completions endpoint and prints each reply together with its \
token usage and latency.\n\n\
API keys:\n\
  DEEPSEEK_API_KEY  deepseek-v3.2\n\
  GEMINI_API_KEY    gemini-2.0-flash\n\
  OPENAI_API_KEY    gpt-4o-mini\n\
  Endpoints and keys can also be set per model in config.toml under [models.\"<id>\"].\n\n\
Logging:\n\
  CHATLET_LOG       tracing filter directive, e.g. chatlet=debug\n\n\
Commands inside the chat:\n\
  /help             List all slash commands\n\
  /clear            Start over\n\
  /summarize        Condense the conversation into a summary"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to chat with
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<ModelId>,

    /// Conversation mode: none, book or json
    #[arg(long, global = true, value_name = "MODE")]
    pub mode: Option<Mode>,

    /// Sampling temperature sent with every turn
    #[arg(short = 't', long, global = true, allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    /// Do not load or save the transcript between sessions
    #[arg(long, global = true)]
    pub no_persist: bool,

    /// Use an alternative config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase diagnostic output on stderr (repeatable)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// Message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the available models
    Models,
    /// Set configuration values, or show them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args)?;

    match args.command {
        None | Some(Commands::Chat) => {
            let persist = !args.no_persist && config.persist_transcript();
            let (controller, backend) = build_session(&args, &config, persist)?;
            run_chat(controller, backend).await
        }
        Some(Commands::Say { ref prompt }) => {
            let (controller, backend) = build_session(&args, &config, false)?;
            run_say(prompt, controller, backend).await
        }
        Some(Commands::Models) => {
            let table = CredentialTable::from_env(&config)?;
            list_models(&table, session_settings(&args, &config).model);
            Ok(())
        }
        Some(Commands::Set { ref key, ref value }) => {
            let mut config = config;
            let registry = SettingRegistry::new();
            let Some(key) = key else {
                println!("Current settings:");
                println!("{}", registry.format_all(&config));
                return Ok(());
            };
            let result = registry
                .handler(key)
                .and_then(|handler| handler.set(value, &mut config))
                .and_then(|message| save_config(&args, &config).map(|_| message));
            report_setting(result);
            Ok(())
        }
        Some(Commands::Unset { ref key }) => {
            let mut config = config;
            let registry = SettingRegistry::new();
            let result = registry
                .handler(key)
                .and_then(|handler| handler.unset(&mut config))
                .and_then(|message| save_config(&args, &config).map(|_| message));
            report_setting(result);
            Ok(())
        }
    }
}

fn report_setting(result: Result<String, SettingError>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}

fn load_config(args: &Args) -> Result<Config, Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn save_config(args: &Args, config: &Config) -> Result<(), SettingError> {
    let result = match &args.config {
        Some(path) => config.save_to_path(path),
        None => config.save(),
    };
    result.map_err(|err| SettingError::ConfigError(err.to_string()))
}

/// Model, mode and temperature for a session; flags win over config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub model: ModelId,
    pub mode: Mode,
    pub temperature: f64,
}

pub fn session_settings(args: &Args, config: &Config) -> SessionSettings {
    SessionSettings {
        model: args.model.unwrap_or_else(|| config.model()),
        mode: args.mode.unwrap_or_else(|| config.mode()),
        temperature: args.temperature.unwrap_or_else(|| config.temperature()),
    }
}

fn build_session(
    args: &Args,
    config: &Config,
    persist: bool,
) -> Result<(ChatController, Arc<dyn ChatBackend>), Box<dyn Error>> {
    let settings = session_settings(args, config);
    let table = CredentialTable::from_env(config)?;
    let resolver = CredentialResolver::new(table, settings.model);

    if !resolver.get_credentials().has_key() {
        warn!(model = %settings.model, "no API key configured; requests will be rejected");
    }

    let mut controller = ChatController::new(resolver, settings.mode, settings.temperature);
    if persist {
        match FileTranscriptStore::in_data_dir() {
            Ok(store) => {
                debug!(path = %store.path().display(), "using transcript store");
                controller = controller.with_store(Box::new(store));
            }
            Err(err) => warn!("transcript persistence unavailable: {err}"),
        }
    }

    let timeout = Duration::from_secs(config.request_timeout_secs());
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpChatBackend::new(timeout)?);

    Ok((controller, backend))
}
