use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BOOK_INSTRUCTION: &str = "You are a friendly librarian helping the user choose a book. \
Ask one short question at a time about their tastes, mood and recent reads. \
Once you know enough, recommend a single book with its author and explain in two sentences why it fits.";

const JSON_INSTRUCTION: &str = "You are a strict JSON assistant. Answer every user request with valid JSON only. \
No explanations, comments, markdown, ```json fences or any other text. Only plain JSON. \
Response format: {\"response\": \"string answering the user's request\", \"type\": \"text\", \"timestamp\": \"ISO 8601 string\"}. \
Use \"error\" or \"clarification\" as the type when appropriate. \
Make sure the JSON is valid and can be parsed without errors.";

/// Named preset selecting the system instruction appended to outbound requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    None,
    Book,
    Json,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::None, Mode::Book, Mode::Json];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::None => "none",
            Mode::Book => "book",
            Mode::Json => "json",
        }
    }

    pub fn system_instruction(self) -> Option<&'static str> {
        match self {
            Mode::None => None,
            Mode::Book => Some(BOOK_INSTRUCTION),
            Mode::Json => Some(JSON_INSTRUCTION),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Mode::None),
            "book" => Ok(Mode::Book),
            "json" => Ok(Mode::Json),
            other => Err(format!("unknown mode '{other}' (expected none, book or json)")),
        }
    }
}
