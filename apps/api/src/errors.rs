use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::credentials::CredentialError;
use crate::llm_client::LlmError;
use crate::scraper::ScrapeError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every response body carries a single user-visible `error` string.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] CredentialError),

    #[error("Model {model} not found")]
    ModelNotFound { model: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Analysis failed: {details}")]
    AnalysisFailed { details: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::ModelNotFound { model, .. } => AppError::ModelNotFound { model },
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl AppError {
    /// Collapses any failure of the image audit into the single
    /// `{error: "Analysis Failed", details}` shape that endpoint reports.
    pub fn analysis_failed(err: impl Into<AppError>) -> Self {
        match err.into() {
            e @ AppError::Validation(_) => e,
            AppError::AnalysisFailed { details } => AppError::AnalysisFailed { details },
            AppError::Llm(msg) => AppError::AnalysisFailed { details: msg },
            other => AppError::AnalysisFailed {
                details: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::Validation(msg) => {
                tracing::warn!("Rejected request: {msg}");
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Configuration(e) => {
                tracing::error!("Configuration error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    e.to_string(),
                    None,
                )
            }
            AppError::ModelNotFound { model } => {
                tracing::error!("Model {model} is not available upstream");
                (
                    StatusCode::NOT_FOUND,
                    "MODEL_NOT_FOUND",
                    format!(
                        "The AI model \"{model}\" could not be found. It may be unavailable \
                         for this API key or region; try again later."
                    ),
                    None,
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    msg.clone(),
                    None,
                )
            }
            AppError::Scrape(e) => {
                tracing::error!("Scrape error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCRAPE_ERROR",
                    e.to_string(),
                    None,
                )
            }
            AppError::AnalysisFailed { details } => {
                tracing::error!("Image analysis failed: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ANALYSIS_FAILED",
                    "Analysis Failed".to_string(),
                    Some(details.clone()),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) = render(AppError::Validation("url is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "url is required");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_model_not_found_is_404_with_friendly_message() {
        let err: AppError = LlmError::ModelNotFound {
            model: "gemini-2.5-flash".into(),
            message: "models/gemini-2.5-flash is not found for API version v1beta".into(),
        }
        .into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("gemini-2.5-flash"));
    }

    #[tokio::test]
    async fn test_llm_error_passes_raw_message_through() {
        let err: AppError = LlmError::Api {
            status: 429,
            message: "Resource has been exhausted".into(),
        }
        .into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Resource has been exhausted"));
    }

    #[tokio::test]
    async fn test_missing_credentials_are_descriptive_500() {
        let (status, body) = render(CredentialError::Missing.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("GEMINI_API_KEYS"));
    }

    #[tokio::test]
    async fn test_analysis_failed_carries_details() {
        let err = AppError::analysis_failed(LlmError::EmptyContent);
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Analysis Failed");
        assert_eq!(body["details"], "LLM returned empty content");
    }

    #[tokio::test]
    async fn test_analysis_failed_keeps_validation_errors() {
        let err = AppError::analysis_failed(AppError::Validation("No image data found".into()));
        let (status, _) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
