use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MIME type assumed when the browser does not declare one for a file part.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// One file pulled out of the multipart body. Lives only for one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(bytes: impl Into<Bytes>, mime_type: Option<&str>, file_name: Option<&str>) -> Self {
        Self {
            file_name: file_name.map(String::from),
            mime_type: mime_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(FALLBACK_MIME_TYPE)
                .to_string(),
            bytes: bytes.into(),
        }
    }
}

/// The two optional images of an analysis request.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Photo of the initial-cost estimate. Required for analysis.
    pub estimate: Option<UploadedFile>,
    /// Photo of the property listing sheet.
    pub drawing: Option<UploadedFile>,
}

/// A fee line the model considers negotiable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiableItem {
    pub name: String,
    pub current: f64,
    pub target: f64,
    pub reason: String,
}

/// The payload shape the output contract asks the model for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub items: Vec<NegotiableItem>,
}

/// Response envelope for `POST /api/analyze`. Always sent with HTTP 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl AnalyzeResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            msg: None,
        }
    }

    pub fn failure(msg: &str) -> Self {
        Self {
            success: false,
            data: None,
            msg: Some(msg.to_string()),
        }
    }
}
