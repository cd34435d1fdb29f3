//! User-facing strings shared by the controller and the terminal surfaces

/// Assistant turn substituted into the transcript when a send fails.
pub const APOLOGY_MESSAGE: &str = "Sorry, I can't process that request.";

pub const CONTEXT_LENGTH_ERROR: &str =
    "The conversation is too long for the model's context window. Clear the chat to continue.";
pub const UNAUTHORIZED_ERROR: &str = "Invalid API key or access denied.";
pub const GENERIC_ERROR: &str = "Could not reach the model.";
pub const SUMMARY_ERROR: &str = "Could not summarize the conversation.";

/// Opening user turn of the guided book conversation.
pub const BOOK_OPENER: &str =
    "I'd like to find a book to read. Ask me questions and then recommend a book.";

/// Marks the system message that replaces a summarized transcript.
pub const SUMMARY_PREFIX: &str = "[SUMMARY OF PREVIOUS CONVERSATION]: ";

pub const SUMMARY_INSTRUCTION: &str = "Briefly summarize the following conversation between the User and the Assistant.
Focus on the key topics, decisions and conclusions. Do not add anything of your own.
The summary must be no longer than 6 sentences.

Conversation:
";
