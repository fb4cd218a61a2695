//! Companion conversation: one in-memory dialogue, append-only between resets.
//!
//! The session owns its history exclusively. Callers that share it across requests wrap it
//! in a `tokio::sync::Mutex` so at most one `send` is in flight at a time.

use crate::adapters::{with_timeout, ChatModel, GenerationParams};
use crate::prompts::{companion_user_prompt, COMPANION_SYSTEM};
use crate::shared::{ChatReply, ChatTurn, UserContext};
use std::sync::Arc;
use std::time::Duration;

pub const CHAT_PARAMS: GenerationParams = GenerationParams::new(200, 0.7);

/// Reply used when the model cannot answer. The dialogue is left unchanged.
pub const LISTENING_REPLY: &str =
    "I'm here to listen. Please tell me more about how you're feeling.";

/// Case-insensitive substrings marking a reply that suggests a practice.
pub const EXERCISE_KEYWORDS: [&str; 6] = [
    "breathing",
    "exercise",
    "meditation",
    "practice",
    "try",
    "mindfulness",
];

const LOG_PREVIEW_CHARS: usize = 50;

pub fn suggests_exercise(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    EXERCISE_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub struct ConversationSession {
    model: Arc<dyn ChatModel>,
    timeout: Duration,
    history: Vec<ChatTurn>,
}

impl ConversationSession {
    pub fn new(model: Arc<dyn ChatModel>, timeout: Duration) -> Self {
        Self {
            model,
            timeout,
            history: Vec::new(),
        }
    }

    /// Sends one message. On success the outbound prompt and the reply are appended;
    /// on failure the history is untouched and the listening reply is returned.
    pub async fn send(&mut self, message: &str, context: Option<&UserContext>) -> ChatReply {
        let prompt = companion_user_prompt(message, context);
        let preview: String = message.chars().take(LOG_PREVIEW_CHARS).collect();
        tracing::info!(target: "mindful::session", preview = %preview, "Chat message received");

        let mut outbound = self.history.clone();
        outbound.push(ChatTurn::user(prompt.clone()));

        match with_timeout(
            self.timeout,
            self.model.complete(COMPANION_SYSTEM, &outbound, &CHAT_PARAMS),
        )
        .await
        {
            Ok(raw) => {
                let reply = raw.trim().to_string();
                let suggests = suggests_exercise(&reply);
                self.history.push(ChatTurn::user(prompt));
                self.history.push(ChatTurn::assistant(reply.clone()));
                ChatReply {
                    reply,
                    suggests_exercise: suggests,
                }
            }
            Err(e) => {
                tracing::warn!(target: "mindful::session", error = %e, "Chat generation failed; sending listening reply");
                ChatReply {
                    reply: LISTENING_REPLY.to_string(),
                    suggests_exercise: false,
                }
            }
        }
    }

    /// Clears the dialogue; the next `send` starts fresh.
    pub fn reset(&mut self) {
        self.history.clear();
        tracing::info!(target: "mindful::session", "Conversation reset");
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Completed user/assistant exchanges.
    pub fn exchange_count(&self) -> usize {
        self.history.len() / 2
    }
}
