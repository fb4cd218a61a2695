//! Local analysis pipeline: refine → classify → neutral override → intensity → summary → dominant.
//!
//! Every stage recovers from its own failures with a documented default. The whole run is
//! additionally bounded by the analysis timeout, past which the fixed neutral result is returned.

use crate::adapters::{with_timeout, ClassifierAdapter, EmotionClassifier, GenerationParams, TextGenerator};
use crate::analyzer::{AnalyzerKind, JournalAnalyzer};
use crate::intensity::{score_intensity, TOP_N};
use crate::neutral::apply_neutral_override;
use crate::prompts::refine_prompt;
use crate::shared::{AnalysisResult, NEUTRAL_LABEL};
use crate::summary::SummaryGenerator;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

pub const REFINE_PARAMS: GenerationParams = GenerationParams::new(400, 0.7);

static REFINED_CUE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)^Refined entry \(same emotion\):\s*").ok());

/// Journal analyzer running the pre-trained classifier and text2text generator.
pub struct LocalAnalyzer {
    classifier: ClassifierAdapter,
    refiner: Arc<dyn TextGenerator>,
    summaries: SummaryGenerator,
    adapter_timeout: Duration,
    analysis_timeout: Duration,
}

impl LocalAnalyzer {
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        generator: Arc<dyn TextGenerator>,
        adapter_timeout: Duration,
        analysis_timeout: Duration,
    ) -> Self {
        Self {
            classifier: ClassifierAdapter::new(classifier, adapter_timeout),
            summaries: SummaryGenerator::new(generator.clone(), adapter_timeout),
            refiner: generator,
            adapter_timeout,
            analysis_timeout,
        }
    }

    /// Clearer rewrite keeping the emotional tone. Falls back to `text` on failure, empty
    /// output or a case-insensitive echo.
    pub async fn refine(&self, text: &str) -> String {
        let raw = match with_timeout(
            self.adapter_timeout,
            self.refiner.generate(&refine_prompt(text), &REFINE_PARAMS),
        )
        .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(target: "mindful::pipeline", error = %e, "Error refining text; keeping original");
                return text.to_string();
            }
        };

        let trimmed = raw.trim();
        let refined = match REFINED_CUE.as_ref() {
            Some(cue) => cue.replace(trimmed, "").trim().to_string(),
            None => trimmed.to_string(),
        };
        if refined.is_empty() || refined.to_lowercase() == text.to_lowercase() {
            return text.to_string();
        }
        refined
    }

    async fn run(&self, text: &str) -> AnalysisResult {
        tracing::info!(target: "mindful::pipeline", len = text.len(), "Refining journal text");
        let refined = self.refine(text).await;

        tracing::info!(target: "mindful::pipeline", "Analyzing emotions");
        let classified = self.classifier.classify(&refined).await;
        let mut scores = apply_neutral_override(classified, &refined);
        scores.truncate(TOP_N);

        let intensity = score_intensity(&scores);
        let emotions: Vec<String> = scores.iter().map(|s| s.label.clone()).collect();
        let summary = self.summaries.summarize(&emotions, intensity, &refined).await;

        // Step-2 classification is reused for the dominant emotion.
        let dominant_emotion = emotions
            .first()
            .cloned()
            .unwrap_or_else(|| NEUTRAL_LABEL.to_string());

        tracing::info!(
            target: "mindful::pipeline",
            dominant = %dominant_emotion,
            intensity,
            "Journal analysis completed"
        );
        AnalysisResult {
            refined_text: refined,
            summary,
            emotions,
            intensity,
            dominant_emotion,
            breakdown: scores,
        }
    }
}

#[async_trait]
impl JournalAnalyzer for LocalAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Local
    }

    async fn analyze(&self, text: &str) -> AnalysisResult {
        match tokio::time::timeout(self.analysis_timeout, self.run(text)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    target: "mindful::pipeline",
                    timeout = ?self.analysis_timeout,
                    "Journal analysis timed out; returning neutral result"
                );
                AnalysisResult::neutral(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RawClassification;
    use crate::error::{MindfulError, MindfulResult};
    use crate::shared::EmotionScore;

    struct Scores(Vec<EmotionScore>);

    #[async_trait]
    impl EmotionClassifier for Scores {
        async fn classify_raw(&self, _text: &str) -> MindfulResult<RawClassification> {
            Ok(RawClassification::Flat(self.0.clone()))
        }
    }

    struct Echo(&'static str);

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> MindfulResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    #[async_trait]
    impl TextGenerator for Broken {
        async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> MindfulResult<String> {
            Err(MindfulError::Adapter("offline".into()))
        }
    }

    fn local(classifier: Vec<EmotionScore>, generator: Arc<dyn TextGenerator>) -> LocalAnalyzer {
        LocalAnalyzer::new(
            Arc::new(Scores(classifier)),
            generator,
            Duration::from_secs(1),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn refine_strips_cue_and_ignores_echo() {
        let a = local(vec![], Arc::new(Echo("Refined entry (same emotion): Today was rough.")));
        assert_eq!(a.refine("today was rough lol").await, "Today was rough.");

        let echo = local(vec![], Arc::new(Echo("REFINED ENTRY (SAME EMOTION): today WAS rough")));
        assert_eq!(echo.refine("Today was rough").await, "Today was rough");
    }

    #[tokio::test]
    async fn refine_failure_keeps_original() {
        let a = local(vec![], Arc::new(Broken));
        assert_eq!(a.refine("keep me as is").await, "keep me as is");
    }

    #[tokio::test]
    async fn analysis_uses_top_three_and_fallback_summary() {
        let a = local(
            vec![
                EmotionScore::new("joy", 0.05),
                EmotionScore::new("sadness", 0.6),
                EmotionScore::new("fear", 0.2),
                EmotionScore::new("anger", 0.1),
            ],
            Arc::new(Broken),
        );
        let r = a.analyze("I lost my job and I can't stop worrying").await;
        assert_eq!(r.emotions, vec!["sadness", "fear", "anger"]);
        assert_eq!(r.intensity, 9);
        assert_eq!(r.dominant_emotion, "sadness");
        assert_eq!(r.refined_text, "I lost my job and I can't stop worrying");
        assert!(r.summary.contains("Work stuff can really get to you"));
    }

    #[tokio::test]
    async fn greeting_is_neutral_with_low_intensity() {
        let a = local(vec![EmotionScore::new("joy", 0.97)], Arc::new(Broken));
        let r = a.analyze("hi").await;
        assert_eq!(r.emotions, vec!["neutral"]);
        assert_eq!(r.intensity, 2);
        assert_eq!(r.dominant_emotion, "neutral");
    }
}
