//! HTTP error body: `{"detail": "..."}` with the matching status code.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mindful_core::MindfulError;

pub(crate) const CHATBOT_NOT_CONFIGURED: &str =
    "Chatbot is not available. Please configure GEMINI_API_KEY.";
pub(crate) const CHATBOT_UNAVAILABLE: &str = "Chatbot is not available";

#[derive(Debug)]
pub(crate) struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "detail": self.detail })),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(target: "mindful::gateway", error = %rejection, "Rejected request body");
        Self::bad_request(rejection.body_text())
    }
}

impl From<MindfulError> for ApiError {
    fn from(err: MindfulError) -> Self {
        match err {
            MindfulError::Validation(detail) => Self::bad_request(detail),
            other => {
                tracing::error!(target: "mindful::gateway", error = %other, "Request failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail: format!("Internal server error: {}", other),
                }
            }
        }
    }
}
