//! POST /analyze_journal

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mindful_core::{validate_journal_entry, AnalysisResult};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct JournalRequest {
    pub journal: String,
}

pub(crate) async fn analyze_journal(
    State(state): State<AppState>,
    payload: Result<Json<JournalRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(req) = payload?;
    validate_journal_entry(&req.journal)?;

    tracing::info!(
        target: "mindful::gateway",
        len = req.journal.len(),
        analyzer = state.analyzer.kind().describe(),
        "Analyzing journal entry"
    );
    let result = state.analyzer.analyze(&req.journal).await;
    Ok(Json(result))
}
