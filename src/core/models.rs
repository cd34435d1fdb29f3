//! Built-in model configuration
//!
//! The set of selectable models is closed: every [`ModelId`] has an entry in
//! the embedded `builtin_models.toml`, which supplies its endpoint and the
//! environment variable its API key is read from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModelId {
    DeepSeekV32,
    #[default]
    Gemini20Flash,
    Gpt4oMini,
}

impl ModelId {
    pub const ALL: [ModelId; 3] = [
        ModelId::DeepSeekV32,
        ModelId::Gemini20Flash,
        ModelId::Gpt4oMini,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::DeepSeekV32 => "deepseek-v3.2",
            ModelId::Gemini20Flash => "gemini-2.0-flash",
            ModelId::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = ModelId::ALL.iter().map(|id| id.as_str()).collect();
                format!("unknown model '{value}' (expected one of: {})", known.join(", "))
            })
    }
}

impl TryFrom<String> for ModelId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModelId> for String {
    fn from(value: ModelId) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinModel {
    pub id: String,
    pub display_name: String,
    pub api_url: String,
    pub api_key_env: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct BuiltinModelsConfig {
    models: Vec<BuiltinModel>,
}

/// Built-in models from the embedded configuration, parsed on first use.
pub fn builtin_models() -> &'static [BuiltinModel] {
    static BUILTIN_MODELS: OnceLock<Vec<BuiltinModel>> = OnceLock::new();
    BUILTIN_MODELS.get_or_init(|| {
        const CONFIG_CONTENT: &str = include_str!("../builtin_models.toml");

        let config: BuiltinModelsConfig =
            toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_models.toml");

        config.models
    })
}

pub fn find_builtin_model(id: ModelId) -> Option<&'static BuiltinModel> {
    builtin_models()
        .iter()
        .find(|model| model.id.eq_ignore_ascii_case(id.as_str()))
}
