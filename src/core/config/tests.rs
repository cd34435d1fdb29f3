use super::data::{Config, ModelOverride, DEFAULT_TEMPERATURE};
use super::io::ConfigError;
use crate::core::mode::Mode;
use crate::core::models::ModelId;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.model(), ModelId::Gemini20Flash);
    assert_eq!(config.mode(), Mode::None);
    assert_eq!(config.temperature(), DEFAULT_TEMPERATURE);
    assert!(config.persist_transcript());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config {
        default_model: Some(ModelId::DeepSeekV32),
        default_mode: Some(Mode::Json),
        temperature: Some(1.2),
        ..Default::default()
    };
    config.models.insert(
        "deepseek-v3.2".to_string(),
        ModelOverride {
            api_url: Some("https://proxy.example/v1/chat/completions".to_string()),
            api_key: None,
            api_key_env: Some("PROXY_KEY".to_string()),
        },
    );
    config.save_to_path(&config_path).expect("save failed");

    let loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded, config);

    config.default_mode = None;
    config.save_to_path(&config_path).expect("second save failed");
    let loaded = Config::load_from_path(&config_path).expect("second load failed");
    assert_eq!(loaded.mode(), Mode::None);
    assert_eq!(loaded.model(), ModelId::DeepSeekV32);
}

#[test]
fn model_tables_parse_from_toml() {
    let raw = r#"
default_model = "gpt-4o-mini"
default_mode = "book"
temperature = 0.2

[models."gpt-4o-mini"]
api_key = "sk-literal"

[models."GEMINI-2.0-FLASH"]
api_key_env = "MY_GEMINI"

[models.mystery]
api_url = "https://nowhere.example"
"#;
    let config: Config = toml::from_str(raw).expect("parse");

    assert_eq!(config.model(), ModelId::Gpt4oMini);
    assert_eq!(config.mode(), Mode::Book);
    assert_eq!(config.temperature(), 0.2);
    assert_eq!(
        config
            .model_override(ModelId::Gpt4oMini)
            .and_then(|entry| entry.api_key.as_deref()),
        Some("sk-literal")
    );
    assert_eq!(
        config
            .model_override(ModelId::Gemini20Flash)
            .and_then(|entry| entry.api_key_env.as_deref()),
        Some("MY_GEMINI")
    );
    assert!(config.model_override(ModelId::DeepSeekV32).is_none());
    assert_eq!(config.unknown_model_keys(), vec!["mystery"]);
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "default_model = [").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
fn unknown_default_model_is_rejected() {
    let err = toml::from_str::<Config>("default_model = \"llama\"").expect_err("should fail");
    assert!(err.to_string().contains("unknown model"));
}
