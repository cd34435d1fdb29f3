use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::mode::Mode;
use crate::core::models::ModelId;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Per-model overrides from the `[models."<id>"]` tables.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct ModelOverride {
    /// Full chat-completions endpoint, replacing the built-in one
    pub api_url: Option<String>,
    /// Literal API key; takes precedence over any environment variable
    pub api_key: Option<String>,
    /// Environment variable to read the API key from
    pub api_key_env: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    pub default_model: Option<ModelId>,
    pub default_mode: Option<Mode>,
    /// Sampling temperature sent with every turn
    pub temperature: Option<f64>,
    /// Keep the transcript on disk between sessions
    pub persist_transcript: Option<bool>,
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelOverride>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn model(&self) -> ModelId {
        self.default_model.unwrap_or_default()
    }

    pub fn mode(&self) -> Mode {
        self.default_mode.unwrap_or_default()
    }

    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn persist_transcript(&self) -> bool {
        self.persist_transcript.unwrap_or(true)
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    pub fn model_override(&self, id: ModelId) -> Option<&ModelOverride> {
        self.models
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(id.as_str()))
            .map(|(_, entry)| entry)
    }

    /// Override tables whose key is not a known model id.
    pub fn unknown_model_keys(&self) -> Vec<&str> {
        self.models
            .keys()
            .filter(|key| key.parse::<ModelId>().is_err())
            .map(String::as_str)
            .collect()
    }
}
