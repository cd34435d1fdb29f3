//! Handlers for the individual configuration keys.

use super::error::SettingError;
use super::helpers::{format_bool, parse_bool, single_arg};
use super::SettingHandler;
use crate::core::config::data::DEFAULT_TEMPERATURE;
use crate::core::config::Config;
use crate::core::mode::Mode;
use crate::core::models::ModelId;

fn model_choices() -> String {
    ModelId::ALL
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn mode_choices() -> String {
    Mode::ALL
        .iter()
        .map(|mode| mode.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct DefaultModelHandler;

impl SettingHandler for DefaultModelHandler {
    fn key(&self) -> &'static str {
        "default-model"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = single_arg(
            args,
            "To set a default model, specify its id:",
            "chatlet set default-model gpt-4o-mini",
        )?;
        let model: ModelId = input.parse().map_err(|_| SettingError::InvalidValue {
            key: self.key(),
            input: input.to_string(),
            hint: format!("Known models: {}", model_choices()),
        })?;
        config.default_model = Some(model);
        Ok(format!("✅ Set default-model to: {model}"))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.default_model = None;
        Ok("✅ Unset default-model".to_string())
    }

    fn format(&self, config: &Config) -> String {
        match config.default_model {
            Some(model) => format!("  default-model: {model}"),
            None => format!("  default-model: (unset, using {})", ModelId::default()),
        }
    }
}

pub struct DefaultModeHandler;

impl SettingHandler for DefaultModeHandler {
    fn key(&self) -> &'static str {
        "default-mode"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = single_arg(
            args,
            "To set a default mode, specify one of none, book or json:",
            "chatlet set default-mode book",
        )?;
        let mode: Mode = input.parse().map_err(|_| SettingError::InvalidValue {
            key: self.key(),
            input: input.to_string(),
            hint: format!("Known modes: {}", mode_choices()),
        })?;
        config.default_mode = Some(mode);
        Ok(format!("✅ Set default-mode to: {mode}"))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.default_mode = None;
        Ok("✅ Unset default-mode".to_string())
    }

    fn format(&self, config: &Config) -> String {
        match config.default_mode {
            Some(mode) => format!("  default-mode: {mode}"),
            None => format!("  default-mode: (unset, using {})", Mode::default()),
        }
    }
}

pub struct TemperatureHandler;

impl SettingHandler for TemperatureHandler {
    fn key(&self) -> &'static str {
        "temperature"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = single_arg(
            args,
            "To set the sampling temperature, specify a number:",
            "chatlet set temperature 0.2",
        )?;
        let temperature: f64 = input
            .parse()
            .ok()
            .filter(|value: &f64| value.is_finite())
            .ok_or_else(|| SettingError::InvalidValue {
                key: self.key(),
                input: input.to_string(),
                hint: "Use a number such as 0.7".to_string(),
            })?;
        config.temperature = Some(temperature);
        Ok(format!("✅ Set temperature to: {temperature}"))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.temperature = None;
        Ok("✅ Unset temperature".to_string())
    }

    fn format(&self, config: &Config) -> String {
        match config.temperature {
            Some(value) => format!("  temperature: {value}"),
            None => format!("  temperature: (unset, using {DEFAULT_TEMPERATURE})"),
        }
    }
}

pub struct PersistTranscriptHandler;

impl SettingHandler for PersistTranscriptHandler {
    fn key(&self) -> &'static str {
        "persist-transcript"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = single_arg(
            args,
            "To toggle transcript persistence, specify on or off:",
            "chatlet set persist-transcript off",
        )?;
        let value = parse_bool(input).ok_or_else(|| SettingError::InvalidValue {
            key: self.key(),
            input: input.to_string(),
            hint: "Use 'on' or 'off' (also accepts true/false, yes/no)".to_string(),
        })?;
        config.persist_transcript = Some(value);
        Ok(format!("✅ Set persist-transcript to: {}", format_bool(value)))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.persist_transcript = None;
        Ok("✅ Unset persist-transcript".to_string())
    }

    fn format(&self, config: &Config) -> String {
        format!(
            "  persist-transcript: {}",
            format_bool(config.persist_transcript())
        )
    }
}
