//! Inference endpoint client for the local pipeline's pre-trained models.
//!
//! Speaks the Hugging Face Inference API shape: `POST {api_url}/{model}` with
//! `{"inputs": ..., "parameters": {...}}`. The classification model answers with a flat or
//! batch-wrapped list of `{label, score}`; the text2text model with `[{"generated_text": ...}]`.

use crate::adapters::{EmotionClassifier, GenerationParams, RawClassification, TextGenerator};
use crate::config::InferenceSettings;
use crate::error::{MindfulError, MindfulResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct InferenceRequest<'a, P: Serialize> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<P>,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Serialize)]
struct Text2TextParameters {
    max_new_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repetition_penalty: Option<f32>,
    do_sample: bool,
}

impl From<&GenerationParams> for Text2TextParameters {
    fn from(p: &GenerationParams) -> Self {
        Self {
            max_new_tokens: p.max_tokens,
            temperature: p.temperature,
            top_p: p.top_p,
            repetition_penalty: p.repetition_penalty,
            do_sample: true,
        }
    }
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Client for the classification and text2text models behind one inference endpoint.
pub struct InferenceClient {
    api_url: String,
    classifier_model: String,
    generator_model: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl InferenceClient {
    pub fn new(settings: &InferenceSettings, token: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            classifier_model: settings.classifier_model.clone(),
            generator_model: settings.generator_model.clone(),
            token: token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            client,
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.api_url, model)
    }

    async fn post<P: Serialize + Send + Sync>(
        &self,
        model: &str,
        body: &InferenceRequest<'_, P>,
    ) -> MindfulResult<reqwest::Response> {
        let mut req = self
            .client
            .post(self.model_url(model))
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(MindfulError::Adapter(format!(
                "Inference API error ({}) for {}: {}",
                status, model, text
            )));
        }
        Ok(res)
    }
}

#[async_trait]
impl EmotionClassifier for InferenceClient {
    async fn classify_raw(&self, text: &str) -> MindfulResult<RawClassification> {
        let body: InferenceRequest<'_, ()> = InferenceRequest {
            inputs: text,
            parameters: None,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };
        let res = self.post(&self.classifier_model, &body).await?;
        let raw: RawClassification = res
            .json()
            .await
            .map_err(|e| MindfulError::Adapter(format!("Unexpected classifier output: {}", e)))?;
        Ok(raw)
    }
}

#[async_trait]
impl TextGenerator for InferenceClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> MindfulResult<String> {
        let body = InferenceRequest {
            inputs: prompt,
            parameters: Some(Text2TextParameters::from(params)),
            options: InferenceOptions {
                wait_for_model: true,
            },
        };
        tracing::debug!(
            target: "mindful::inference",
            model = %self.generator_model,
            len = prompt.len(),
            "Text2text request"
        );
        let res = self.post(&self.generator_model, &body).await?;
        let generated: Vec<GeneratedText> = res
            .json()
            .await
            .map_err(|e| MindfulError::Adapter(format!("Unexpected generator output: {}", e)))?;
        generated
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| MindfulError::Adapter("Generator returned no sequences".to_string()))
    }
}
