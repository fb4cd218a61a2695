//! Single-call journal analysis prompt for the hosted model.
//!
//! The coarse mapping rules (nostalgia→sadness, resentment→anger, ...) are instructions to the
//! model only; nothing downstream enforces them.

pub const HOSTED_ANALYSIS_TEMPLATE: &str = r#"Analyze this journal entry for emotions. Respond in JSON format only.

Journal: "{journal}"

Identify emotions and provide scores. Be specific (nostalgia, resentment, longing, guilt, hope, etc.).

JSON format:
{
  "emotions": [{"label": "emotion_name", "score": 0.0-1.0}],
  "dominant": "main_emotion",
  "intensity": 1-10,
  "summary": "brief empathetic summary (1 sentence)"
}

Rules:
- Map complex emotions: nostalgia/longing/regret→sadness, resentment→anger, contentment/acceptance/hope→calm
- Scores sum to ~1.0
- Only include emotions with score >= 0.15
- Keep summary under 20 words"#;

pub fn hosted_analysis_prompt(journal: &str) -> String {
    HOSTED_ANALYSIS_TEMPLATE.replace("{journal}", journal)
}
