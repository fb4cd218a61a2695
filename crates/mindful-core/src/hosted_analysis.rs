//! Hosted analysis mode: one round-trip asking the hosted model for a JSON emotion report.

use crate::adapters::{with_timeout, GenerationParams, TextGenerator};
use crate::analyzer::{AnalyzerKind, JournalAnalyzer};
use crate::error::{MindfulError, MindfulResult};
use crate::prompts::hosted_analysis_prompt;
use crate::shared::{sort_descending, AnalysisResult, EmotionScore, NEUTRAL_RESULT_INTENSITY};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const HOSTED_ANALYSIS_PARAMS: GenerationParams = GenerationParams::new(300, 0.3);

/// Normalized scores below this are dropped.
pub const SCORE_FLOOR: f64 = 0.10;

pub const MISSING_SUMMARY: &str = "You appear to be experiencing complex emotions.";

const MAX_LABELS: usize = 3;

#[derive(Debug, Deserialize)]
struct HostedReport {
    #[serde(default)]
    emotions: Vec<EmotionScore>,
    #[serde(default)]
    dominant: Option<String>,
    #[serde(default)]
    intensity: Option<f64>,
    #[serde(default)]
    summary: Option<String>,
}

/// Journal analyzer backed by a single hosted-model call.
pub struct HostedAnalyzer {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl HostedAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    async fn request_report(&self, text: &str) -> MindfulResult<AnalysisResult> {
        let prompt = hosted_analysis_prompt(text);
        let response = with_timeout(
            self.timeout,
            self.generator.generate(&prompt, &HOSTED_ANALYSIS_PARAMS),
        )
        .await?;
        parse_report(&response, text)
    }
}

#[async_trait]
impl JournalAnalyzer for HostedAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Hosted
    }

    async fn analyze(&self, text: &str) -> AnalysisResult {
        match self.request_report(text).await {
            Ok(result) => {
                tracing::info!(
                    target: "mindful::hosted",
                    dominant = %result.dominant_emotion,
                    intensity = result.intensity,
                    "Hosted analysis complete"
                );
                result
            }
            Err(e) => {
                tracing::warn!(target: "mindful::hosted", error = %e, "Hosted analysis failed; returning neutral result");
                AnalysisResult::neutral(text)
            }
        }
    }
}

/// Body of the first ```json fence, else of the first ``` fence, else the whole response.
pub fn extract_json_block(response: &str) -> &str {
    let response = response.trim();
    let after = if let Some((_, rest)) = response.split_once("```json") {
        rest
    } else if let Some((_, rest)) = response.split_once("```") {
        rest
    } else {
        return response;
    };
    after.split("```").next().unwrap_or(after).trim()
}

/// Negative or non-finite scores count as zero. Rescales to sum 1 (when the total is positive),
/// drops entries under the floor, then rescales the survivors so they sum to 1 again and sorts
/// descending. Never returns an empty set.
pub fn normalize_scores(emotions: Vec<EmotionScore>) -> Vec<EmotionScore> {
    let cleaned: Vec<EmotionScore> = emotions
        .into_iter()
        .map(|e| {
            let score = if e.score.is_finite() { e.score.max(0.0) } else { 0.0 };
            EmotionScore::new(e.label, score)
        })
        .collect();
    let total: f64 = cleaned.iter().map(|e| e.score).sum();

    let mut kept: Vec<EmotionScore> = cleaned
        .into_iter()
        .map(|e| {
            let score = if total > 0.0 { e.score / total } else { e.score };
            EmotionScore::new(e.label, score)
        })
        .filter(|e| e.score >= SCORE_FLOOR && !e.label.trim().is_empty())
        .collect();

    if kept.is_empty() {
        return vec![EmotionScore::neutral(1.0)];
    }
    let kept_total: f64 = kept.iter().map(|e| e.score).sum();
    if kept_total > 0.0 {
        for e in kept.iter_mut() {
            e.score /= kept_total;
        }
    }
    sort_descending(&mut kept);
    kept
}

fn report_intensity(raw: Option<f64>) -> u8 {
    match raw {
        Some(v) if v.is_finite() => v.round().clamp(1.0, 10.0) as u8,
        _ => NEUTRAL_RESULT_INTENSITY,
    }
}

/// Parses the hosted model's reply into a result for `text`.
pub fn parse_report(response: &str, text: &str) -> MindfulResult<AnalysisResult> {
    let json = extract_json_block(response);
    if json.is_empty() {
        return Err(MindfulError::Parse("empty hosted response".to_string()));
    }
    let report: HostedReport = serde_json::from_str(json)?;
    let breakdown = normalize_scores(report.emotions);

    let emotions: Vec<String> = breakdown
        .iter()
        .take(MAX_LABELS)
        .map(|e| e.label.clone())
        .collect();
    let summary = report
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| MISSING_SUMMARY.to_string());
    let dominant_emotion = report
        .dominant
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| breakdown[0].label.clone());

    Ok(AnalysisResult {
        refined_text: text.to_string(),
        summary,
        emotions,
        intensity: report_intensity(report.intensity),
        dominant_emotion,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedGenerator(MindfulResult<&'static str>);

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str, params: &GenerationParams) -> MindfulResult<String> {
            assert_eq!(params.max_tokens, 300);
            match &self.0 {
                Ok(s) => Ok(s.to_string()),
                Err(e) => Err(MindfulError::Adapter(e.to_string())),
            }
        }
    }

    fn analyzer(reply: MindfulResult<&'static str>) -> HostedAnalyzer {
        HostedAnalyzer::new(Arc::new(ScriptedGenerator(reply)), Duration::from_secs(1))
    }

    #[test]
    fn extracts_fenced_json() {
        assert_eq!(extract_json_block("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(extract_json_block("Sure:\n```\n{\"a\":2}\n```\nbye"), "{\"a\":2}");
        assert_eq!(extract_json_block("  {\"a\":3}  "), "{\"a\":3}");
    }

    #[test]
    fn normalization_keeps_balanced_set() {
        let out = normalize_scores(vec![
            EmotionScore::new("joy", 0.4),
            EmotionScore::new("love", 0.4),
            EmotionScore::new("surprise", 0.2),
        ]);
        assert_eq!(out.len(), 3);
        let total: f64 = out.iter().map(|e| e.score).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn normalization_drops_entries_under_floor() {
        let out = normalize_scores(vec![
            EmotionScore::new("sadness", 8.0),
            EmotionScore::new("fear", 1.5),
            EmotionScore::new("joy", 0.5),
        ]);
        let labels: Vec<_> = out.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["sadness", "fear"]);
        let total: f64 = out.iter().map(|e| e.score).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((out[0].score - 8.0 / 9.5).abs() < 1e-9);
    }

    #[test]
    fn normalization_rescales_survivors_after_floor() {
        let mut raw = vec![EmotionScore::new("sadness", 0.55)];
        raw.extend(["a", "b", "c", "d", "e"].iter().map(|l| EmotionScore::new(*l, 0.09)));
        let out = normalize_scores(raw);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "sadness");
        assert!((out[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn normalization_substitutes_neutral_when_empty() {
        assert_eq!(normalize_scores(vec![]), vec![EmotionScore::neutral(1.0)]);
        assert_eq!(
            normalize_scores(vec![EmotionScore::new("joy", -1.0)]),
            vec![EmotionScore::neutral(1.0)]
        );
    }

    #[test]
    fn parse_fills_missing_fields() {
        let r = parse_report(
            r#"{"emotions":[{"label":"fear","score":0.3},{"label":"sadness","score":0.7}],"intensity":14}"#,
            "entry",
        )
        .unwrap();
        assert_eq!(r.emotions, vec!["sadness", "fear"]);
        assert_eq!(r.dominant_emotion, "sadness");
        assert_eq!(r.intensity, 10);
        assert_eq!(r.summary, MISSING_SUMMARY);
        assert_eq!(r.refined_text, "entry");
    }

    #[tokio::test]
    async fn fenced_reply_is_analyzed() {
        let a = analyzer(Ok(
            "```json\n{\"emotions\":[{\"label\":\"joy\",\"score\":0.8},{\"label\":\"love\",\"score\":0.2}],\"dominant\":\"joy\",\"intensity\":7,\"summary\":\"You sound delighted.\"}\n```",
        ));
        let r = a.analyze("Got the job offer today!").await;
        assert_eq!(r.dominant_emotion, "joy");
        assert_eq!(r.intensity, 7);
        assert_eq!(r.summary, "You sound delighted.");
        assert_eq!(r.breakdown.len(), 2);
    }

    #[tokio::test]
    async fn adapter_failure_yields_neutral_result() {
        let r = analyzer(Err(MindfulError::Adapter("503".into())))
            .analyze("I feel a lot today")
            .await;
        assert_eq!(r, AnalysisResult::neutral("I feel a lot today"));
        assert_eq!(r.intensity, 5);
    }

    #[tokio::test]
    async fn malformed_json_yields_neutral_result() {
        let r = analyzer(Ok("I think you are sad")).analyze("I feel a lot today").await;
        assert_eq!(r.emotions, vec!["neutral"]);
        assert_eq!(r.intensity, 5);
    }
}
