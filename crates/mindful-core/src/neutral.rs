//! Neutral heuristic: forces a single neutral reading on trivial input.
//!
//! Classifiers are miscalibrated on short factual utterances ("hi", "my name is Sam"). The
//! rules below are an ordered policy table; any match replaces the whole classification with
//! `[{neutral, 0.9}]`. Otherwise the classification passes through untouched and neutral is
//! never injected next to a real signal.

use crate::shared::EmotionScore;
use serde::{Deserialize, Serialize};

/// Score of the forced neutral entry.
pub const FORCED_NEUTRAL_SCORE: f64 = 0.9;

/// Exact (normalized) greetings and thanks.
pub const GREETINGS: [&str; 6] = [
    "hello",
    "hi",
    "good morning",
    "good evening",
    "thanks",
    "thank you",
];

/// Words that disqualify an "i am a ..." statement from being neutral. Substring match.
pub const EMOTION_BEARING_WORDS: [&str; 10] = [
    "happy", "sad", "angry", "excited", "tired", "amazing", "great", "terrible", "love", "hate",
];

const IDENTITY_PREFIX: &str = "i am a ";
const IDENTITY_MAX_TOKENS: usize = 6;
const NAME_PREFIX: &str = "my name is ";
const NAME_MAX_TOKENS: usize = 5;
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.3;
const SHORT_TEXT_MAX_CHARS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeutralRule {
    /// "i am a ..." with at most 6 tokens and no emotion-bearing word.
    IdentityStatement,
    /// "my name is ..." with at most 5 tokens.
    NameStatement,
    /// Exact greeting or thanks.
    Greeting,
    /// Highest score below 0.3 and fewer than 15 characters.
    LowConfidenceShortText,
}

struct NeutralInput<'a> {
    text: &'a str,
    tokens: usize,
    top_score: f64,
}

type RuleCheck = fn(&NeutralInput<'_>) -> bool;

fn identity_statement(i: &NeutralInput<'_>) -> bool {
    i.text.starts_with(IDENTITY_PREFIX)
        && i.tokens <= IDENTITY_MAX_TOKENS
        && !EMOTION_BEARING_WORDS.iter().any(|w| i.text.contains(w))
}

fn name_statement(i: &NeutralInput<'_>) -> bool {
    i.text.starts_with(NAME_PREFIX) && i.tokens <= NAME_MAX_TOKENS
}

fn greeting(i: &NeutralInput<'_>) -> bool {
    GREETINGS.iter().any(|g| *g == i.text)
}

fn low_confidence_short_text(i: &NeutralInput<'_>) -> bool {
    i.top_score < LOW_CONFIDENCE_THRESHOLD && i.text.chars().count() < SHORT_TEXT_MAX_CHARS
}

/// Checked in order; the first match wins.
const NEUTRAL_RULES: [(NeutralRule, RuleCheck); 4] = [
    (NeutralRule::IdentityStatement, identity_statement),
    (NeutralRule::NameStatement, name_statement),
    (NeutralRule::Greeting, greeting),
    (NeutralRule::LowConfidenceShortText, low_confidence_short_text),
];

/// First rule that forces neutral for this text, if any. `classification` must be sorted descending.
pub fn matched_rule(classification: &[EmotionScore], text: &str) -> Option<NeutralRule> {
    let normalized = text.trim().to_lowercase();
    let input = NeutralInput {
        text: &normalized,
        tokens: normalized.split_whitespace().count(),
        top_score: classification.first().map(|s| s.score).unwrap_or(0.0),
    };
    NEUTRAL_RULES
        .iter()
        .find(|(_, check)| check(&input))
        .map(|(rule, _)| *rule)
}

/// Returns `[{neutral, 0.9}]` when a rule matches, otherwise the classification unchanged.
pub fn apply_neutral_override(classification: Vec<EmotionScore>, text: &str) -> Vec<EmotionScore> {
    match matched_rule(&classification, text) {
        Some(rule) => {
            tracing::debug!(target: "mindful::neutral", rule = ?rule, "Neutral override applied");
            vec![EmotionScore::neutral(FORCED_NEUTRAL_SCORE)]
        }
        None => classification,
    }
}
