//! mindful-core: journal emotion analysis and companion chat.
//!
//! Two analyzers share one contract: the local pipeline (classifier + text2text generator
//! behind an inference endpoint) and the hosted mode (one JSON-producing call to a hosted
//! model). The companion session exists only when the hosted API is configured.

mod adapters;
mod analyzer;
mod config;
mod error;
mod hosted_analysis;
mod hosted_client;
mod inference;
mod intensity;
mod neutral;
mod pipeline;
mod session;
mod shared;
mod summary;
mod validation;
mod wellness;
pub mod prompts;

// Shared data model
pub use shared::{
    sort_descending, AnalysisResult, ChatReply, ChatRole, ChatTurn, EmotionScore, UserContext,
    NEUTRAL_LABEL, NEUTRAL_RESULT_INTENSITY, NEUTRAL_SUMMARY,
};

// Capability traits and concrete clients
pub use adapters::{
    normalize_classification, with_timeout, ChatModel, ClassifierAdapter, EmotionClassifier,
    GenerationParams, RawClassification, TextGenerator, CLASSIFIER_FALLBACK_SCORE,
};
pub use hosted_client::HostedClient;
pub use inference::InferenceClient;

// Analysis
pub use analyzer::{AnalyzerKind, Capabilities, JournalAnalyzer};
pub use hosted_analysis::{
    extract_json_block, normalize_scores, parse_report, HostedAnalyzer, MISSING_SUMMARY,
    SCORE_FLOOR,
};
pub use intensity::{score_intensity, NEUTRAL_INTENSITY};
pub use neutral::{apply_neutral_override, matched_rule, NeutralRule, FORCED_NEUTRAL_SCORE};
pub use pipeline::LocalAnalyzer;
pub use summary::{
    check_quality, fallback_summary, strip_boilerplate, QualityRejection, SummaryGenerator,
    SummaryPath,
};

// Companion chat
pub use session::{suggests_exercise, ConversationSession, LISTENING_REPLY};
pub use wellness::{random_tip, WELLNESS_TIPS};

// Request validation
pub use validation::{validate_chat_message, validate_journal_entry, MIN_JOURNAL_CHARS};

// Config and errors
pub use config::{hosted_api_key, inference_token, AnalyzerMode, CoreConfig, HostedSettings, InferenceSettings};
pub use error::{MindfulError, MindfulResult};
