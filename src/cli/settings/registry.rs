//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{
    DefaultModeHandler, DefaultModelHandler, PersistTranscriptHandler, TemperatureHandler,
};
use super::{SettingError, SettingHandler};
use crate::core::config::Config;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `chatlet set` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(DefaultModelHandler));
        registry.register(Box::new(DefaultModeHandler));
        registry.register(Box::new(TemperatureHandler));
        registry.register(Box::new(PersistTranscriptHandler));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Get a handler by key.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    pub fn handler(&self, key: &str) -> Result<&dyn SettingHandler, SettingError> {
        self.get(key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
    }

    /// Get all keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }

    /// Current value of every setting, one per line.
    pub fn format_all(&self, config: &Config) -> String {
        self.display_order
            .iter()
            .filter_map(|key| self.get(key))
            .map(|handler| handler.format(config))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
