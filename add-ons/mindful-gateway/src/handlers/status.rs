//! GET / and GET /health

use crate::state::AppState;
use axum::extract::State;
use axum::Json;

pub(crate) async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    let chatbot = if state.session.is_some() {
        "Available"
    } else {
        "Unavailable"
    };
    Json(serde_json::json!({
        "message": format!("{} is running", state.config.app_name),
        "analyzer": state.analyzer.kind().describe(),
        "chatbot": chatbot,
    }))
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "message": format!("{} is operational", state.config.app_name),
    }))
}
