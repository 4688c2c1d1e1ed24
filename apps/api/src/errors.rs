use axum::{
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::analysis::AnalyzeResponse;

/// Message returned when the estimate image is missing.
pub const MISSING_FILE_MSG: &str = "No file";
/// Message returned for every other failure. Causes are logged, never exposed.
pub const GENERIC_FAILURE_MSG: &str = "Error";

/// Failure of one analysis request.
/// Implements `IntoResponse` so the analyze handler can return `Result<T, AnalysisError>`.
///
/// Every variant renders as HTTP 200 with `success: false`; clients rely on the flag.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Estimate file is missing")]
    MissingInput,

    #[error("Upload could not be read: {0}")]
    Upload(String),

    #[error("Upstream model error: {0}")]
    Upstream(#[from] LlmError),

    #[error("Model output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn message(&self) -> &'static str {
        match self {
            AnalysisError::MissingInput => MISSING_FILE_MSG,
            AnalysisError::Upload(_) | AnalysisError::Upstream(_) | AnalysisError::Parse(_) => {
                GENERIC_FAILURE_MSG
            }
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        match &self {
            AnalysisError::MissingInput => tracing::warn!("Analysis rejected: {self}"),
            AnalysisError::Upload(msg) => tracing::error!("Upload error: {msg}"),
            AnalysisError::Upstream(e) => tracing::error!("LLM error: {e}"),
            AnalysisError::Parse(e) => tracing::error!("Parse error: {e}"),
        }

        Json(AnalyzeResponse::failure(self.message())).into_response()
    }
}
