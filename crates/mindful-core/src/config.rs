//! Service configuration loaded from `config/mindful.toml` and the environment.
//!
//! API credentials are never read from the file: they come from `.env` / the process
//! environment only (see [`hosted_api_key`] and [`inference_token`]).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const ENV_CONFIG_PATH: &str = "MINDFUL_CONFIG";
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_LLM_API_KEY: &str = "MINDFUL_LLM_API_KEY";
const ENV_HF_API_TOKEN: &str = "HF_API_TOKEN";

pub const DEFAULT_HOSTED_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";
pub const DEFAULT_HOSTED_MODEL: &str = "gemini-2.0-flash-lite";
pub const DEFAULT_INFERENCE_API_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "bhadresh-savani/distilbert-base-uncased-emotion";
pub const DEFAULT_GENERATOR_MODEL: &str = "google/flan-t5-base";

/// Which journal analyzer the process runs with. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerMode {
    /// Hosted when an API key is present, local pipeline otherwise.
    #[default]
    Auto,
    Hosted,
    Local,
}

/// Hosted generative-language API (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedSettings {
    pub api_url: String,
    pub model: String,
}

impl Default for HostedSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_HOSTED_API_URL.to_string(),
            model: DEFAULT_HOSTED_MODEL.to_string(),
        }
    }
}

/// Inference endpoint serving the classification and text2text models of the local pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceSettings {
    pub api_url: String,
    pub classifier_model: String,
    pub generator_model: String,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_INFERENCE_API_URL.to_string(),
            classifier_model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            generator_model: DEFAULT_GENERATOR_MODEL.to_string(),
        }
    }
}

/// Service configuration.
///
/// | Key | Default | Description |
/// |-----|---------|-------------|
/// | app_name | Emotion Analysis API | Reported by `GET /`. |
/// | host / port | 0.0.0.0 / 8000 | Bind address. `PORT` overrides the port. |
/// | analyzer_mode | auto | auto \| hosted \| local |
/// | cors_origins | localhost:3000, *.vercel.app | Allowed browser origins. |
/// | adapter_timeout_secs | 60 | Per classifier/generator call. |
/// | analysis_timeout_secs | 180 | Whole local pipeline. |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub analyzer_mode: AnalyzerMode,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub adapter_timeout_secs: u64,
    pub analysis_timeout_secs: u64,
    #[serde(default)]
    pub hosted: HostedSettings,
    #[serde(default)]
    pub inference: InferenceSettings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "Emotion Analysis API".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            analyzer_mode: AnalyzerMode::Auto,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "https://*.vercel.app".to_string(),
            ],
            adapter_timeout_secs: 60,
            analysis_timeout_secs: 180,
            hosted: HostedSettings::default(),
            inference: InferenceSettings::default(),
        }
    }
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: `PORT` > `MINDFUL__*` env >
    /// file at `MINDFUL_CONFIG` (default `config/mindful.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| "config/mindful.toml".to_string());
        let defaults = CoreConfig::default();
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name.as_str())?
            .set_default("host", defaults.host.as_str())?
            .set_default("port", i64::from(defaults.port))?
            .set_default("analyzer_mode", "auto")?
            .set_default("cors_origins", defaults.cors_origins.clone())?
            .set_default("adapter_timeout_secs", defaults.adapter_timeout_secs as i64)?
            .set_default("analysis_timeout_secs", defaults.analysis_timeout_secs as i64)?
            .set_default("hosted.api_url", DEFAULT_HOSTED_API_URL)?
            .set_default("hosted.model", DEFAULT_HOSTED_MODEL)?
            .set_default("inference.api_url", DEFAULT_INFERENCE_API_URL)?
            .set_default("inference.classifier_model", DEFAULT_CLASSIFIER_MODEL)?
            .set_default("inference.generator_model", DEFAULT_GENERATOR_MODEL)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("MINDFUL")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("port", env_opt_string("PORT"))?
            .build()?;

        built.try_deserialize()
    }

    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_secs(self.adapter_timeout_secs.max(1))
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs.max(1))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Hosted API key: GEMINI_API_KEY, or MINDFUL_LLM_API_KEY as fallback. Blank values count as unset.
pub fn hosted_api_key() -> Option<String> {
    env_opt_string(ENV_GEMINI_API_KEY).or_else(|| env_opt_string(ENV_LLM_API_KEY))
}

/// Optional bearer token for the inference endpoint (HF_API_TOKEN).
pub fn inference_token() -> Option<String> {
    env_opt_string(ENV_HF_API_TOKEN)
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
