/// Pretty-prints `text` with two-space indentation if it is valid JSON.
///
/// Object keys keep their original order. Returns `None` for anything that
/// does not parse, including empty input.
pub fn format_json(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text.trim()).ok()?;
    serde_json::to_string_pretty(&value).ok()
}
