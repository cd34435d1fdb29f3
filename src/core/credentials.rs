//! Model selection to endpoint/key resolution.
//!
//! A [`CredentialTable`] holds one [`Credentials`] pair per [`ModelId`] and
//! cannot be constructed incomplete, so resolving a model never fails. The
//! [`CredentialResolver`] tracks the pair for the currently selected model.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use tracing::{debug, warn};

use crate::core::config::Config;
use crate::core::models::{find_builtin_model, ModelId};

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_url: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// Keys stay out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_url", &self.api_url)
            .field("api_key", &if self.has_key() { "<set>" } else { "<empty>" })
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Neither the built-in table nor config.toml provides an endpoint.
    Unconfigured(ModelId),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Unconfigured(model) => write!(
                f,
                "No endpoint configured for model '{model}'. Add api_url under [models.\"{model}\"] in config.toml."
            ),
        }
    }
}

impl Error for CredentialError {}

#[derive(Debug, Clone)]
pub struct CredentialTable {
    entries: HashMap<ModelId, Credentials>,
}

impl CredentialTable {
    /// Builds a table with an explicit entry for every model.
    pub fn from_entries(
        entries: HashMap<ModelId, Credentials>,
    ) -> Result<Self, CredentialError> {
        if let Some(missing) = ModelId::ALL.into_iter().find(|id| !entries.contains_key(id)) {
            return Err(CredentialError::Unconfigured(missing));
        }
        Ok(Self { entries })
    }

    /// Builds the table from built-in endpoints, config overrides and the
    /// environment, read through `env_lookup`.
    ///
    /// Key precedence: `api_key` in config, then the variable named by
    /// `api_key_env` in config, then the built-in variable. A model with no
    /// key resolves to an empty key, which the endpoint rejects with 401.
    pub fn from_config<F>(config: &Config, env_lookup: F) -> Result<Self, CredentialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in config.unknown_model_keys() {
            warn!(model = key, "ignoring config for unknown model");
        }

        let mut entries = HashMap::new();
        for id in ModelId::ALL {
            let builtin = find_builtin_model(id);
            let overrides = config.model_override(id);

            let api_url = overrides
                .and_then(|entry| entry.api_url.clone())
                .or_else(|| builtin.map(|model| model.api_url.clone()))
                .ok_or(CredentialError::Unconfigured(id))?;

            let key_env = overrides
                .and_then(|entry| entry.api_key_env.clone())
                .or_else(|| builtin.map(|model| model.api_key_env.clone()));

            let api_key = overrides
                .and_then(|entry| entry.api_key.clone())
                .or_else(|| key_env.as_deref().and_then(&env_lookup))
                .unwrap_or_default();

            if api_key.is_empty() {
                debug!(model = %id, env = ?key_env, "no API key configured");
            }

            entries.insert(id, Credentials { api_url, api_key });
        }

        Self::from_entries(entries)
    }

    pub fn from_env(config: &Config) -> Result<Self, CredentialError> {
        Self::from_config(config, |name| {
            std::env::var(name).ok().filter(|value| !value.is_empty())
        })
    }

    pub fn get(&self, model: ModelId) -> &Credentials {
        // Complete by construction; see `from_entries`.
        &self.entries[&model]
    }
}

/// Pure lookup of the pair for `model`.
pub fn resolve(table: &CredentialTable, model: ModelId) -> Credentials {
    table.get(model).clone()
}

/// Holds the credentials for the currently selected model.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    table: CredentialTable,
    model: ModelId,
    current: Credentials,
}

impl CredentialResolver {
    pub fn new(table: CredentialTable, model: ModelId) -> Self {
        let current = resolve(&table, model);
        Self {
            table,
            model,
            current,
        }
    }

    pub fn set_credentials(&mut self, model: ModelId) {
        self.current = resolve(&self.table, model);
        self.model = model;
        debug!(model = %model, api_url = %self.current.api_url, "selected model");
    }

    /// Current pair by value; read it immediately before dispatching.
    pub fn get_credentials(&self) -> Credentials {
        self.current.clone()
    }

    pub fn model(&self) -> ModelId {
        self.model
    }
}
