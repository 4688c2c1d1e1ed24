//! Axum route handler for the Analysis API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::service::analyze;
use crate::errors::AnalysisError;
use crate::models::analysis::{AnalyzeResponse, UploadRequest, UploadedFile};
use crate::state::AppState;

/// Multipart field carrying the estimate photo (required).
pub const ESTIMATE_FIELD: &str = "estimateFile";
/// Multipart field carrying the listing-sheet photo (optional).
pub const DRAWING_FIELD: &str = "drawingFile";

/// POST /api/analyze
///
/// Reads up to two images from the multipart body, runs one model call and
/// returns `{success, data}` or `{success: false, msg}`. Always HTTP 200.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AnalysisError> {
    let request_id = Uuid::new_v4();
    run_analysis(state, multipart)
        .instrument(info_span!("analyze", %request_id))
        .await
}

async fn run_analysis(
    state: AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AnalysisError> {
    let multipart = multipart.map_err(|e| AnalysisError::Upload(e.body_text()))?;
    let upload = read_upload(multipart).await?;

    info!(
        estimate_name = upload.estimate.as_ref().and_then(|f| f.file_name.as_deref()),
        estimate_bytes = upload.estimate.as_ref().map(|f| f.bytes.len()),
        estimate_type = upload.estimate.as_ref().map(|f| f.mime_type.as_str()),
        drawing_bytes = upload.drawing.as_ref().map(|f| f.bytes.len()),
        "Analysis requested"
    );

    let data = analyze(state.generator.as_ref(), &upload).await?;
    Ok(Json(AnalyzeResponse::ok(data)))
}

/// Collects the known file fields. Unknown fields are drained and ignored;
/// an empty file field counts as absent. A repeated field keeps the last value.
/// A non-empty text value under a file field name is an upload error.
async fn read_upload(mut multipart: Multipart) -> Result<UploadRequest, AnalysisError> {
    let mut upload = UploadRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalysisError::Upload(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let mime_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AnalysisError::Upload(e.body_text()))?;

        if bytes.is_empty() {
            continue;
        }

        let slot = match name.as_str() {
            ESTIMATE_FIELD => &mut upload.estimate,
            DRAWING_FIELD => &mut upload.drawing,
            _ => continue,
        };
        if file_name.is_none() {
            return Err(AnalysisError::Upload(format!("field `{name}` is not a file")));
        }
        *slot = Some(UploadedFile::new(bytes, mime_type.as_deref(), file_name.as_deref()));
    }

    Ok(upload)
}
