//! Analyzer selection and process-wide capabilities.

use crate::config::{inference_token, AnalyzerMode, CoreConfig};
use crate::error::{MindfulError, MindfulResult};
use crate::hosted_analysis::HostedAnalyzer;
use crate::hosted_client::HostedClient;
use crate::inference::InferenceClient;
use crate::pipeline::LocalAnalyzer;
use crate::session::ConversationSession;
use crate::shared::AnalysisResult;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    Hosted,
    Local,
}

impl AnalyzerKind {
    /// Human-readable label reported by the status endpoint.
    pub fn describe(&self) -> &'static str {
        match self {
            AnalyzerKind::Hosted => "AI-powered (hosted)",
            AnalyzerKind::Local => "Local models",
        }
    }
}

/// Turns a journal entry into an `AnalysisResult`. Never fails: every error path ends in a
/// documented default.
#[async_trait]
pub trait JournalAnalyzer: Send + Sync {
    fn kind(&self) -> AnalyzerKind;
    async fn analyze(&self, text: &str) -> AnalysisResult;
}

/// Everything the service needs, selected once at startup.
pub struct Capabilities {
    pub analyzer: Arc<dyn JournalAnalyzer>,
    /// Present only when the hosted API key is configured.
    pub session: Option<ConversationSession>,
}

impl Capabilities {
    /// Builds the analyzer and (optionally) the companion session from config and environment.
    pub fn from_config(config: &CoreConfig) -> MindfulResult<Self> {
        let hosted = HostedClient::from_env(&config.hosted, config.adapter_timeout()).map(Arc::new);
        Self::assemble(config, hosted)
    }

    fn assemble(config: &CoreConfig, hosted: Option<Arc<HostedClient>>) -> MindfulResult<Self> {
        let timeout = config.adapter_timeout();
        let analyzer: Arc<dyn JournalAnalyzer> = match (config.analyzer_mode, &hosted) {
            (AnalyzerMode::Hosted, None) => {
                return Err(MindfulError::Config(
                    "analyzer_mode = hosted requires GEMINI_API_KEY".to_string(),
                ))
            }
            (AnalyzerMode::Hosted | AnalyzerMode::Auto, Some(client)) => {
                Arc::new(HostedAnalyzer::new(client.clone(), timeout))
            }
            (AnalyzerMode::Local, _) | (AnalyzerMode::Auto, None) => {
                let inference = Arc::new(InferenceClient::new(
                    &config.inference,
                    inference_token(),
                    timeout,
                ));
                Arc::new(LocalAnalyzer::new(
                    inference.clone(),
                    inference,
                    timeout,
                    config.analysis_timeout(),
                ))
            }
        };

        let session = hosted.map(|client| ConversationSession::new(client, timeout));
        tracing::info!(
            target: "mindful::core",
            analyzer = analyzer.kind().describe(),
            chatbot = session.is_some(),
            "Capabilities initialized"
        );
        Ok(Self { analyzer, session })
    }
}
