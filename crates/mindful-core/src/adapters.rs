//! Capability interfaces consumed by the analysis pipeline and the companion session.
//!
//! The classifier and generators are opaque: "given text, return ranked {label, score}" and
//! "given a prompt, return text". Concrete clients live in `inference` and `hosted_client`.

use crate::error::{MindfulError, MindfulResult};
use crate::shared::{sort_descending, ChatTurn, EmotionScore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Score of the single entry returned when the classifier cannot be used.
pub const CLASSIFIER_FALLBACK_SCORE: f64 = 0.8;

/// Raw classifier output: either a flat list or a batch wrapping one list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawClassification {
    Batched(Vec<Vec<EmotionScore>>),
    Flat(Vec<EmotionScore>),
}

impl RawClassification {
    /// Flattens to one list: a batch contributes its first entry only.
    pub fn into_flat(self) -> Vec<EmotionScore> {
        match self {
            RawClassification::Flat(scores) => scores,
            RawClassification::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
        }
    }
}

/// Sampling parameters passed to a generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
}

impl GenerationParams {
    pub const fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
            top_p: None,
            repetition_penalty: None,
        }
    }

    pub const fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub const fn with_repetition_penalty(mut self, penalty: f32) -> Self {
        self.repetition_penalty = Some(penalty);
        self
    }
}

/// "Classify free text into ranked {label, score} pairs."
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify_raw(&self, text: &str) -> MindfulResult<RawClassification>;
}

/// "Given a prompt, produce free text."
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> MindfulResult<String>;
}

/// Multi-turn generation: system instruction plus the recorded conversation, newest last.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        history: &[ChatTurn],
        params: &GenerationParams,
    ) -> MindfulResult<String>;
}

/// Awaits one adapter call under a request-level timeout. Expiry is an adapter failure.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> MindfulResult<T>
where
    F: Future<Output = MindfulResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(MindfulError::Timeout(limit)),
    }
}

/// Classifier Adapter: never fails outward.
#[derive(Clone)]
pub struct ClassifierAdapter {
    classifier: Arc<dyn EmotionClassifier>,
    timeout: Duration,
}

impl ClassifierAdapter {
    pub fn new(classifier: Arc<dyn EmotionClassifier>, timeout: Duration) -> Self {
        Self {
            classifier,
            timeout,
        }
    }

    /// Non-empty, sorted descending, scores clamped into [0, 1].
    /// Adapter errors and empty output become `[{neutral, 0.8}]`.
    pub async fn classify(&self, text: &str) -> Vec<EmotionScore> {
        match with_timeout(self.timeout, self.classifier.classify_raw(text)).await {
            Ok(raw) => {
                let scores = normalize_classification(raw);
                if scores.is_empty() {
                    tracing::warn!(
                        target: "mindful::classifier",
                        "Classifier returned no scores; using neutral default"
                    );
                    return vec![EmotionScore::neutral(CLASSIFIER_FALLBACK_SCORE)];
                }
                scores
            }
            Err(e) => {
                tracing::error!(target: "mindful::classifier", error = %e, "Error classifying emotions");
                vec![EmotionScore::neutral(CLASSIFIER_FALLBACK_SCORE)]
            }
        }
    }
}

/// Flattens, drops non-finite scores, clamps into [0, 1] and sorts descending.
pub fn normalize_classification(raw: RawClassification) -> Vec<EmotionScore> {
    let mut scores: Vec<EmotionScore> = raw
        .into_flat()
        .into_iter()
        .filter(|s| s.score.is_finite() && !s.label.trim().is_empty())
        .map(|s| EmotionScore::new(s.label, s.score.clamp(0.0, 1.0)))
        .collect();
    sort_descending(&mut scores);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier(MindfulResult<RawClassification>);

    #[async_trait]
    impl EmotionClassifier for FixedClassifier {
        async fn classify_raw(&self, _text: &str) -> MindfulResult<RawClassification> {
            match &self.0 {
                Ok(raw) => Ok(raw.clone()),
                Err(e) => Err(MindfulError::Adapter(e.to_string())),
            }
        }
    }

    struct SlowClassifier;

    #[async_trait]
    impl EmotionClassifier for SlowClassifier {
        async fn classify_raw(&self, _text: &str) -> MindfulResult<RawClassification> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(RawClassification::Flat(vec![EmotionScore::new("joy", 0.9)]))
        }
    }

    fn adapter(result: MindfulResult<RawClassification>) -> ClassifierAdapter {
        ClassifierAdapter::new(Arc::new(FixedClassifier(result)), Duration::from_secs(1))
    }

    #[test]
    fn batched_json_flattens_to_first_batch() {
        let raw: RawClassification = serde_json::from_str(
            r#"[[{"label":"joy","score":0.2},{"label":"fear","score":0.7}]]"#,
        )
        .unwrap();
        let flat = normalize_classification(raw);
        assert_eq!(flat[0].label, "fear");
        assert_eq!(flat[1].label, "joy");
    }

    #[test]
    fn flat_json_is_accepted() {
        let raw: RawClassification =
            serde_json::from_str(r#"[{"label":"anger","score":0.4}]"#).unwrap();
        assert_eq!(raw, RawClassification::Flat(vec![EmotionScore::new("anger", 0.4)]));
    }

    #[tokio::test]
    async fn classify_sorts_and_clamps() {
        let a = adapter(Ok(RawClassification::Flat(vec![
            EmotionScore::new("joy", 0.1),
            EmotionScore::new("sadness", 1.4),
            EmotionScore::new("fear", -0.2),
        ])));
        let out = a.classify("anything").await;
        assert_eq!(out[0], EmotionScore::new("sadness", 1.0));
        assert_eq!(out[2], EmotionScore::new("fear", 0.0));
        assert!(out.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn classify_error_yields_neutral_default() {
        let a = adapter(Err(MindfulError::Adapter("down".into())));
        assert_eq!(a.classify("text").await, vec![EmotionScore::neutral(0.8)]);
    }

    #[tokio::test]
    async fn classify_empty_output_yields_neutral_default() {
        let a = adapter(Ok(RawClassification::Batched(vec![])));
        assert_eq!(a.classify("text").await, vec![EmotionScore::neutral(0.8)]);
    }

    #[tokio::test]
    async fn classify_timeout_yields_neutral_default() {
        let a = ClassifierAdapter::new(Arc::new(SlowClassifier), Duration::from_millis(50));
        assert_eq!(a.classify("text").await, vec![EmotionScore::neutral(0.8)]);
    }
}
