//! Companion chat routes: POST /chat, POST /chat/reset, GET /wellness-tip.
//!
//! All three answer 503 when no hosted API key was configured at startup. `/chat` checks
//! that before validating the message.

use crate::error::{ApiError, CHATBOT_NOT_CONFIGURED, CHATBOT_UNAVAILABLE};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mindful_core::{random_tip, validate_chat_message, UserContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    pub message: String,
    /// Free-form hints (recent_emotion, mood_trend, journal_summary); other keys are ignored.
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatResponse {
    pub message: String,
    pub suggests_exercise: bool,
    pub timestamp: Option<String>,
}

pub(crate) async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let session = state
        .session
        .as_ref()
        .ok_or_else(|| ApiError::unavailable(CHATBOT_NOT_CONFIGURED))?;
    let Json(req) = payload?;
    validate_chat_message(&req.message)?;

    let context = req
        .context
        .as_ref()
        .filter(|v| v.is_object())
        .map(UserContext::from_value);
    let reply = session.lock().await.send(&req.message, context.as_ref()).await;

    Ok(Json(ChatResponse {
        message: reply.reply,
        suggests_exercise: reply.suggests_exercise,
        timestamp: None,
    }))
}

pub(crate) async fn reset_chat(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state
        .session
        .as_ref()
        .ok_or_else(|| ApiError::unavailable(CHATBOT_UNAVAILABLE))?;
    session.lock().await.reset();
    Ok(Json(serde_json::json!({
        "message": "Chat conversation reset successfully"
    })))
}

pub(crate) async fn wellness_tip(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.session.is_none() {
        return Err(ApiError::unavailable(CHATBOT_UNAVAILABLE));
    }
    Ok(Json(serde_json::json!({ "tip": random_tip() })))
}
