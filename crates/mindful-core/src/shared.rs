//! Shared data model: emotion scores, analysis results, chat turns and caller context.

use serde::{Deserialize, Serialize};

/// Label used whenever the emotional state is forced or defaulted to neutral.
pub const NEUTRAL_LABEL: &str = "neutral";

/// Summary carried by the fixed neutral result.
pub const NEUTRAL_SUMMARY: &str = "Your emotions appear balanced and neutral.";

/// Intensity carried by the fixed neutral result.
pub const NEUTRAL_RESULT_INTENSITY: u8 = 5;

/// One ranked classifier entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    #[serde(default)]
    pub score: f64,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    pub fn neutral(score: f64) -> Self {
        Self::new(NEUTRAL_LABEL, score)
    }

    pub fn is_neutral(&self) -> bool {
        self.label.eq_ignore_ascii_case(NEUTRAL_LABEL)
    }
}

/// Sorts scores descending. NaN scores sink to the end.
pub fn sort_descending(scores: &mut [EmotionScore]) {
    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or_else(|| a.score.is_nan().cmp(&b.score.is_nan()))
    });
}

/// Final analysis of one journal entry. Built once per call, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "refined")]
    pub refined_text: String,
    pub summary: String,
    /// Most confident first, at most three labels.
    pub emotions: Vec<String>,
    /// 1..=10
    pub intensity: u8,
    pub dominant_emotion: String,
    /// Scores behind `emotions` (hosted mode: every retained label).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<EmotionScore>,
}

impl AnalysisResult {
    /// The fixed neutral result returned whenever an analysis cannot complete.
    pub fn neutral(text: &str) -> Self {
        Self {
            refined_text: text.to_string(),
            summary: NEUTRAL_SUMMARY.to_string(),
            emotions: vec![NEUTRAL_LABEL.to_string()],
            intensity: NEUTRAL_RESULT_INTENSITY,
            dominant_emotion: NEUTRAL_LABEL.to_string(),
            breakdown: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One recorded message of the companion conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// Optional side-channel hints folded into the next chat prompt. Never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default)]
    pub recent_emotion: Option<String>,
    #[serde(default)]
    pub mood_trend: Option<String>,
    #[serde(default)]
    pub journal_summary: Option<String>,
}

impl UserContext {
    /// Builds context from caller JSON. Non-string values are kept as JSON text; other keys are ignored.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let field = |key: &str| -> Option<String> {
            match value.get(key)? {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            }
        };
        Self {
            recent_emotion: field("recent_emotion"),
            mood_trend: field("mood_trend"),
            journal_summary: field("journal_summary"),
        }
    }

    /// Bracketed hint lines, one per non-empty field, in fixed order.
    pub fn hint_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(v) = non_empty(&self.recent_emotion) {
            lines.push(format!("[User's recent emotion: {}]", v));
        }
        if let Some(v) = non_empty(&self.mood_trend) {
            lines.push(format!("[User's mood trend: {}]", v));
        }
        if let Some(v) = non_empty(&self.journal_summary) {
            lines.push(format!("[Recent journal: {}]", v));
        }
        lines
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Reply of one companion chat exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub suggests_exercise: bool,
}
