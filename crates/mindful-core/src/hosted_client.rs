//! Hosted generative-language API client (OpenAI-compatible chat completions).
//!
//! Backs both the hosted analysis mode (one user message per call) and the companion
//! session (system instruction + conversation history). API key: `GEMINI_API_KEY` in `.env`.

use crate::adapters::{ChatModel, GenerationParams, TextGenerator};
use crate::config::{hosted_api_key, HostedSettings};
use crate::error::{MindfulError, MindfulResult};
use crate::shared::ChatTurn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Debug, PartialEq)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Hosted model client. Construct once at startup and share behind `Arc`.
pub struct HostedClient {
    api_key: String,
    api_url: String,
    model: String,
    client: reqwest::Client,
}

impl HostedClient {
    /// Client using the API key from the environment. Returns `None` if no key is set.
    pub fn from_env(settings: &HostedSettings, timeout: Duration) -> Option<Self> {
        hosted_api_key().map(|key| Self::new(key, settings, timeout))
    }

    /// Client with an explicit API key.
    pub fn new(api_key: String, settings: &HostedSettings, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.trim().to_string(),
            api_url: settings.api_url.clone(),
            model: settings.model.clone(),
            client,
        }
    }

    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        params: &GenerationParams,
    ) -> MindfulResult<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(params.temperature),
            top_p: params.top_p,
            max_tokens: Some(params.max_tokens),
        };

        let res = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| MindfulError::Adapter(format!("Hosted API request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(MindfulError::Adapter(format!(
                "Hosted API error {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = res
            .json()
            .await
            .map_err(|e| MindfulError::Adapter(format!("Hosted API response parse failed: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| MindfulError::Adapter("No response from hosted API".to_string()))
    }
}

fn build_messages(system: &str, history: &[ChatTurn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    if !system.trim().is_empty() {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system.to_string(),
        });
    }
    messages.extend(history.iter().map(|turn| ChatMessage {
        role: turn.role.as_str().to_string(),
        content: turn.text.clone(),
    }));
    messages
}

#[async_trait]
impl TextGenerator for HostedClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> MindfulResult<String> {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];
        self.chat_completion(messages, params).await
    }
}

#[async_trait]
impl ChatModel for HostedClient {
    async fn complete(
        &self,
        system: &str,
        history: &[ChatTurn],
        params: &GenerationParams,
    ) -> MindfulResult<String> {
        self.chat_completion(build_messages(system, history), params)
            .await
    }
}
