//! mindful-gateway: HTTP surface for journal analysis and the companion chat.
//!
//! Routes:
//! - `GET /` and `GET /health`: service status
//! - `POST /analyze_journal`: `{journal}` → analysis result
//! - `POST /chat`, `POST /chat/reset`, `GET /wellness-tip`: companion (503 without a hosted API key)

mod error;
mod handlers;
mod state;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use mindful_core::{Capabilities, CoreConfig};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Secrets (GEMINI_API_KEY, HF_API_TOKEN) live in .env or the process environment only.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[mindful-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match CoreConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(target: "mindful::gateway", error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };
    let capabilities = match Capabilities::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(target: "mindful::gateway", error = %e, "Failed to initialize analyzers");
            std::process::exit(1);
        }
    };
    if capabilities.session.is_none() {
        tracing::warn!(
            target: "mindful::gateway",
            "GEMINI_API_KEY not set: chat and wellness tips are unavailable"
        );
    }

    let addr = config.bind_address();
    let app = build_app(AppState::new(config, capabilities));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(target: "mindful::gateway", addr = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(target: "mindful::gateway", "Mindful gateway listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(target: "mindful::gateway", "Server error: {}", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(target: "mindful::gateway", "Failed to listen for Ctrl+C: {}", e);
        return;
    }
    tracing::info!(target: "mindful::gateway", "Shutdown signal received");
}

/// True if `origin` is listed, or matches a `scheme://*.suffix` wildcard entry.
fn origin_allowed(origin: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|entry| match entry.split_once("*.") {
        Some((scheme, suffix)) => origin
            .strip_prefix(scheme)
            .and_then(|host| host.strip_suffix(suffix))
            .and_then(|sub| sub.strip_suffix('.'))
            .map(|sub| !sub.is_empty() && !sub.contains('/'))
            .unwrap_or(false),
        None => entry == origin,
    })
}

fn build_app(state: AppState) -> Router {
    let allowed = Arc::new(state.config.cors_origins.clone());
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|o| origin_allowed(o, &allowed))
                .unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/", get(handlers::status::root))
        .route("/health", get(handlers::status::health))
        .route("/analyze_journal", post(handlers::journal::analyze_journal))
        .route("/chat", post(handlers::chat::chat))
        .route("/chat/reset", post(handlers::chat::reset_chat))
        .route("/wellness-tip", get(handlers::chat::wellness_tip))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use mindful_core::{
        AnalysisResult, AnalyzerKind, ChatModel, ChatTurn, ConversationSession, GenerationParams,
        JournalAnalyzer, MindfulError, MindfulResult, WELLNESS_TIPS,
    };
    use axum::response::IntoResponse;
    use std::time::Duration;
    use tower::ServiceExt;

    struct StubAnalyzer;

    #[async_trait]
    impl JournalAnalyzer for StubAnalyzer {
        fn kind(&self) -> AnalyzerKind {
            AnalyzerKind::Local
        }

        async fn analyze(&self, text: &str) -> AnalysisResult {
            AnalysisResult {
                refined_text: text.to_string(),
                summary: "I can feel how much this means to you.".to_string(),
                emotions: vec!["love".to_string(), "joy".to_string()],
                intensity: 7,
                dominant_emotion: "love".to_string(),
                breakdown: Vec::new(),
            }
        }
    }

    struct CoachModel;

    #[async_trait]
    impl ChatModel for CoachModel {
        async fn complete(
            &self,
            _system: &str,
            history: &[ChatTurn],
            _params: &GenerationParams,
        ) -> MindfulResult<String> {
            Ok(format!(
                "I hear you ({} turns). Want to try a short breathing exercise?",
                history.len()
            ))
        }
    }

    fn test_app(with_chat: bool) -> Router {
        let session = with_chat
            .then(|| ConversationSession::new(Arc::new(CoachModel), Duration::from_secs(1)));
        let state = AppState::new(
            CoreConfig::default(),
            Capabilities {
                analyzer: Arc::new(StubAnalyzer),
                session,
            },
        );
        build_app(state)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn cors_origins_support_subdomain_wildcards() {
        let allowed = vec![
            "http://localhost:3000".to_string(),
            "https://*.vercel.app".to_string(),
        ];
        assert!(origin_allowed("http://localhost:3000", &allowed));
        assert!(origin_allowed("https://mindful-journal.vercel.app", &allowed));
        assert!(!origin_allowed("https://vercel.app", &allowed));
        assert!(!origin_allowed("http://app.vercel.app", &allowed));
        assert!(!origin_allowed("https://evil.com/.vercel.app", &allowed));
        assert!(!origin_allowed("http://localhost:3001", &allowed));
    }

    #[tokio::test]
    async fn short_journal_is_rejected() {
        let res = test_app(false)
            .oneshot(post_json("/analyze_journal", r#"{"journal":"  hi  "}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = json_body(res).await;
        assert_eq!(json["detail"], "Journal entry must be at least 10 characters long");
    }

    #[tokio::test]
    async fn journal_analysis_returns_result_shape() {
        let res = test_app(false)
            .oneshot(post_json(
                "/analyze_journal",
                r#"{"journal":"I finally called my sister after months"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = json_body(res).await;
        assert_eq!(json["refined"], "I finally called my sister after months");
        assert_eq!(json["emotions"], serde_json::json!(["love", "joy"]));
        assert_eq!(json["intensity"], 7);
        assert_eq!(json["dominant_emotion"], "love");
        assert!(json.get("breakdown").is_none());
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request_with_detail() {
        let res = test_app(false)
            .oneshot(post_json("/analyze_journal", "{not json"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(res).await["detail"].is_string());
    }

    #[tokio::test]
    async fn core_errors_map_to_status_codes() {
        let bad = error::ApiError::from(MindfulError::Validation("nope".to_string()));
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.detail, "nope");

        let res = error::ApiError::from(MindfulError::Config("missing key".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(res).await["detail"],
            "Internal server error: Configuration error: missing key"
        );
    }

    #[tokio::test]
    async fn chat_unavailable_takes_precedence_over_validation() {
        let res = test_app(false)
            .oneshot(post_json("/chat", r#"{"message":"   "}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            json_body(res).await["detail"],
            "Chatbot is not available. Please configure GEMINI_API_KEY."
        );
    }

    #[tokio::test]
    async fn empty_chat_message_is_rejected() {
        let res = test_app(true)
            .oneshot(post_json("/chat", r#"{"message":"   "}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["detail"], "Message cannot be empty");
    }

    #[tokio::test]
    async fn chat_reply_flags_exercise_suggestions() {
        let res = test_app(true)
            .oneshot(post_json(
                "/chat",
                r#"{"message":"I feel tense","context":{"recent_emotion":"anger","mood_trend":null}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = json_body(res).await;
        assert_eq!(
            json["message"],
            "I hear you (1 turns). Want to try a short breathing exercise?"
        );
        assert_eq!(json["suggests_exercise"], true);
        assert!(json["timestamp"].is_null());
    }

    #[tokio::test]
    async fn conversation_accumulates_until_reset() {
        let app = test_app(true);
        app.clone()
            .oneshot(post_json("/chat", r#"{"message":"first"}"#))
            .await
            .unwrap();

        let res = app
            .clone()
            .oneshot(post_json("/chat/reset", ""))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            json_body(res).await["message"],
            "Chat conversation reset successfully"
        );

        let res = app
            .oneshot(post_json("/chat", r#"{"message":"again"}"#))
            .await
            .unwrap();
        let json = json_body(res).await;
        assert!(json["message"].as_str().unwrap().contains("(1 turns)"));
    }

    #[tokio::test]
    async fn reset_and_tip_require_chatbot() {
        let app = test_app(false);
        let res = app
            .clone()
            .oneshot(post_json("/chat/reset", ""))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let res = app.oneshot(get_req("/wellness-tip")).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(res).await["detail"], "Chatbot is not available");
    }

    #[tokio::test]
    async fn wellness_tip_comes_from_the_canned_list() {
        let res = test_app(true).oneshot(get_req("/wellness-tip")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = json_body(res).await;
        let tip = json["tip"].as_str().unwrap();
        assert!(WELLNESS_TIPS.iter().any(|t| *t == tip));
    }

    #[tokio::test]
    async fn status_routes_report_service_state() {
        let app = test_app(false);
        let res = app.clone().oneshot(get_req("/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = json_body(res).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["message"], "Emotion Analysis API is operational");

        let json = json_body(app.oneshot(get_req("/")).await.unwrap()).await;
        assert_eq!(json["message"], "Emotion Analysis API is running");
        assert_eq!(json["analyzer"], "Local models");
        assert_eq!(json["chatbot"], "Unavailable");
    }
}
