//! Model listing functionality

use crate::core::credentials::CredentialTable;
use crate::core::models::{find_builtin_model, ModelId};

/// One line per model: marker, id, display name, endpoint and key status.
pub fn model_lines(table: &CredentialTable, default_model: ModelId) -> Vec<String> {
    ModelId::ALL
        .into_iter()
        .map(|id| {
            let credentials = table.get(id);
            let marker = if id == default_model { "*" } else { " " };
            let display_name = find_builtin_model(id)
                .map_or(id.as_str(), |model| model.display_name.as_str());
            let key_status = if credentials.has_key() {
                "key configured"
            } else {
                "no key"
            };
            format!(
                "{marker} {:<18} {:<20} {} ({key_status})",
                id.as_str(),
                display_name,
                credentials.api_url
            )
        })
        .collect()
}

pub fn list_models(table: &CredentialTable, default_model: ModelId) {
    println!("🤖 Available Models");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    for line in model_lines(table, default_model) {
        println!("{line}");
    }
    println!();
    println!("* marks the model used when -m is not given.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    #[test]
    fn marks_default_and_key_status() {
        let table = CredentialTable::from_config(&Config::default(), |name| {
            (name == "OPENAI_API_KEY").then(|| "sk-test".to_string())
        })
        .expect("table");

        let lines = model_lines(&table, ModelId::Gpt4oMini);
        assert_eq!(lines.len(), ModelId::ALL.len());

        let openai = lines
            .iter()
            .find(|line| line.contains("gpt-4o-mini"))
            .expect("gpt line");
        assert!(openai.starts_with('*'));
        assert!(openai.contains("https://api.openai.com/v1/chat/completions"));
        assert!(openai.contains("(key configured)"));
        assert!(!openai.contains("sk-test"));

        let deepseek = lines
            .iter()
            .find(|line| line.contains("deepseek-v3.2"))
            .expect("deepseek line");
        assert!(deepseek.starts_with(' '));
        assert!(deepseek.ends_with("(no key)"));
    }
}
