//! Request-level checks shared by every surface that accepts journal entries or chat messages.

use crate::error::{MindfulError, MindfulResult};

/// Minimum characters of a journal entry after trimming.
pub const MIN_JOURNAL_CHARS: usize = 10;

pub fn validate_journal_entry(text: &str) -> MindfulResult<()> {
    if text.trim().chars().count() < MIN_JOURNAL_CHARS {
        return Err(MindfulError::Validation(format!(
            "Journal entry must be at least {} characters long",
            MIN_JOURNAL_CHARS
        )));
    }
    Ok(())
}

pub fn validate_chat_message(message: &str) -> MindfulResult<()> {
    if message.trim().is_empty() {
        return Err(MindfulError::Validation("Message cannot be empty".to_string()));
    }
    Ok(())
}
