//! Helper functions for settings operations.

use super::error::SettingError;

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Format a boolean value for display.
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Returns the single value argument or a `MissingArgs` error.
pub fn single_arg<'a>(
    args: &'a [String],
    hint: &'static str,
    example: &'static str,
) -> Result<&'a str, SettingError> {
    match args {
        [value] if !value.trim().is_empty() => Ok(value.trim()),
        _ => Err(SettingError::MissingArgs { hint, example }),
    }
}
