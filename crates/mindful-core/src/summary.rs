//! Empathetic summary generation with a quality gate and deterministic fallback templates.
//!
//! Generated text is accepted only if it reads as peer empathy: long enough, free of the
//! path's disallowed words and free of assistant disclaimers. Anything else, including a
//! generator failure, falls back to canned sentences keyed by the primary emotion.

use crate::adapters::{with_timeout, GenerationParams, TextGenerator};
use crate::prompts::{emotional_summary_prompt, neutral_summary_prompt};
use crate::shared::NEUTRAL_LABEL;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

/// Characters of the entry included in the prompt.
pub const PROMPT_EXCERPT_CHARS: usize = 300;
/// Characters of the entry scanned for fallback context keywords.
pub const CONTEXT_SNIPPET_CHARS: usize = 150;

pub const SUMMARY_PARAMS: GenerationParams = GenerationParams::new(400, 0.9)
    .with_top_p(0.95)
    .with_repetition_penalty(1.15);

const NEUTRAL_MIN_CHARS: usize = 20;
const EMOTIONAL_MIN_CHARS: usize = 30;

/// Overly intense descriptors; rejected on the neutral path.
pub const NEUTRAL_DISALLOWED: [&str; 5] = [
    "intensity",
    "powerful",
    "deep emotion",
    "raw feeling",
    "extraordinary",
];

/// Advice-giving words; rejected on the emotional path.
pub const EMOTIONAL_DISALLOWED: [&str; 6] =
    ["should", "try", "suggest", "recommend", "advice", "tips"];

pub const AI_DISCLOSURE_PHRASES: [&str; 4] = [
    "i am an ai",
    "as an ai",
    "i understand that",
    "it appears that",
];

/// Echoed prompt cues, stripped in this order.
static BOILERPLATE_PREFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        "Your heartfelt response:",
        "Your friendly response:",
        "Your heartfelt emotional reflection:",
        "Your gentle acknowledgment:",
        "Response:",
    ]
    .iter()
    .filter_map(|cue| Regex::new(&format!(r"(?i)^{}\s*", regex::escape(cue))).ok())
    .collect()
});

const IDENTITY_PHRASES: [&str; 4] = ["i am a", "my name is", "i live in", "i work as"];
const SHORT_SNIPPET_CHARS: usize = 30;

const NEUTRAL_APPRECIATION: &str = "Thanks for sharing that with me. I appreciate you being so open and straightforward - there's something really genuine about the way you express yourself.";
const NEUTRAL_REFLECTION: &str = "I can sense a calm, thoughtful energy in what you've shared. It feels like you're in a peaceful headspace right now.";

const EMOTION_REFLECTIONS: [(&str, &str); 7] = [
    ("joy", "The happiness is just radiating from your words! It sounds like you're in such a good place right now."),
    ("sadness", "I can feel the heaviness in what you've shared. It sounds like you're going through something really tough."),
    ("anger", "I can sense the fire and frustration you're feeling. That intensity is really coming through."),
    ("fear", "There's definitely some anxiety and worry coming through in your words. I can feel that uncertainty you're experiencing."),
    ("surprise", "It sounds like something really caught you off guard! I can sense that feeling of being shaken up."),
    ("love", "The warmth and affection in your words is so beautiful. I can feel how much this means to you."),
    ("disgust", "I can sense your strong reaction to this. It sounds like something really rubbed you the wrong way."),
];

/// Opening clauses by minimum intensity, checked top-down.
const INTENSITY_OPENINGS: [(u8, &str); 4] = [
    (8, "Wow, I can really feel the intensity of what you're going through"),
    (6, "I can feel how deeply this is affecting you"),
    (4, "There's definitely some strong emotions coming through"),
    (0, "I can sense the emotions beneath the surface"),
];

/// Context clauses by keyword; first match wins.
const CONTEXT_CLAUSES: [(&[&str], &str); 4] = [
    (&["work", "job"], " Work stuff can really get to you, can't it?"),
    (
        &["family", "friend", "relationship"],
        " Relationships can bring up such complex feelings.",
    ),
    (&["tired", "exhausted"], " It sounds like you're really feeling drained."),
    (&["excited", "amazing"], " That excitement is so contagious!"),
];

/// Which prompt and quality rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPath {
    Neutral,
    Emotional,
}

impl SummaryPath {
    pub fn for_primary(primary: &str) -> Self {
        if primary.eq_ignore_ascii_case(NEUTRAL_LABEL) {
            SummaryPath::Neutral
        } else {
            SummaryPath::Emotional
        }
    }

    fn min_chars(self) -> usize {
        match self {
            SummaryPath::Neutral => NEUTRAL_MIN_CHARS,
            SummaryPath::Emotional => EMOTIONAL_MIN_CHARS,
        }
    }

    fn disallowed(self) -> &'static [&'static str] {
        match self {
            SummaryPath::Neutral => &NEUTRAL_DISALLOWED,
            SummaryPath::Emotional => &EMOTIONAL_DISALLOWED,
        }
    }
}

/// Why generated text was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityRejection {
    TooShort(usize),
    DisallowedWord(&'static str),
    AiDisclosure(&'static str),
}

/// Removes echoed prompt cues (case-insensitive) and trims.
pub fn strip_boilerplate(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    for prefix in BOILERPLATE_PREFIXES.iter() {
        text = prefix.replace(&text, "").into_owned();
    }
    text.trim().to_string()
}

pub fn check_quality(summary: &str, path: SummaryPath) -> Result<(), QualityRejection> {
    let len = summary.chars().count();
    if len < path.min_chars() {
        return Err(QualityRejection::TooShort(len));
    }
    let lower = summary.to_lowercase();
    if let Some(word) = path.disallowed().iter().copied().find(|w| lower.contains(w)) {
        return Err(QualityRejection::DisallowedWord(word));
    }
    if let Some(phrase) = AI_DISCLOSURE_PHRASES.iter().copied().find(|p| lower.contains(p)) {
        return Err(QualityRejection::AiDisclosure(phrase));
    }
    Ok(())
}

/// Deterministic summary for when generation fails or is rejected.
pub fn fallback_summary(emotions: &[String], intensity: u8, text: &str) -> String {
    let primary = emotions.first().map(String::as_str).unwrap_or(NEUTRAL_LABEL);
    let snippet: String = text
        .chars()
        .take(CONTEXT_SNIPPET_CHARS)
        .collect::<String>()
        .to_lowercase();

    if primary.eq_ignore_ascii_case(NEUTRAL_LABEL) {
        let short = snippet.chars().count() < SHORT_SNIPPET_CHARS;
        return if short || IDENTITY_PHRASES.iter().any(|p| snippet.contains(p)) {
            NEUTRAL_APPRECIATION.to_string()
        } else {
            NEUTRAL_REFLECTION.to_string()
        };
    }

    let opening = INTENSITY_OPENINGS
        .iter()
        .find(|(min, _)| intensity >= *min)
        .map(|(_, clause)| *clause)
        .unwrap_or(INTENSITY_OPENINGS[3].1);
    let context = CONTEXT_CLAUSES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| snippet.contains(k)))
        .map(|(_, clause)| *clause)
        .unwrap_or("");
    let reflection = EMOTION_REFLECTIONS
        .iter()
        .find(|(label, _)| *label == primary)
        .map(|(_, sentence)| sentence.to_string())
        .unwrap_or_else(|| format!("I can really feel the {} you're experiencing.", primary));

    format!("{}.{} {}", opening, context, reflection)
}

/// Builds summary prompts, invokes the generator and gates the output.
#[derive(Clone)]
pub struct SummaryGenerator {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl SummaryGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Never fails: every rejection or error yields `fallback_summary`.
    pub async fn summarize(&self, emotions: &[String], intensity: u8, text: &str) -> String {
        let primary = emotions.first().map(String::as_str).unwrap_or(NEUTRAL_LABEL);
        let path = SummaryPath::for_primary(primary);
        let excerpt: String = text.chars().take(PROMPT_EXCERPT_CHARS).collect();
        let prompt = match path {
            SummaryPath::Neutral => neutral_summary_prompt(&excerpt),
            SummaryPath::Emotional => {
                let joined = if emotions.len() > 1 {
                    emotions.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
                } else {
                    primary.to_string()
                };
                emotional_summary_prompt(&excerpt, &joined, intensity)
            }
        };

        let generated = match with_timeout(
            self.timeout,
            self.generator.generate(&prompt, &SUMMARY_PARAMS),
        )
        .await
        {
            Ok(raw) => strip_boilerplate(&raw),
            Err(e) => {
                tracing::error!(target: "mindful::summary", error = %e, "Summary generation failed; using fallback");
                return fallback_summary(emotions, intensity, text);
            }
        };

        match check_quality(&generated, path) {
            Ok(()) => generated,
            Err(reason) => {
                tracing::info!(
                    target: "mindful::summary",
                    primary = %primary,
                    reason = ?reason,
                    "Generated summary rejected; using fallback"
                );
                fallback_summary(emotions, intensity, text)
            }
        }
    }
}
