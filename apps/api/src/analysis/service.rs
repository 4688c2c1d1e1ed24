//! Estimate analysis pipeline.
//!
//! Flow: validate upload → build multimodal parts → generator.generate() →
//!       strip_json_fences → serde_json parse → pass-through JSON.
//!
//! One generator call per request. Nothing is retried or cached.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::analysis::prompts::{DRAWING_CONTEXT, ESTIMATE_CONTEXT, OUTPUT_CONTRACT};
use crate::analysis::sanitize::strip_json_fences;
use crate::errors::AnalysisError;
use crate::llm_client::{Generator, Part};
use crate::models::analysis::{AnalysisResult, UploadRequest, UploadedFile};

/// Builds the ordered prompt: estimate image, its framing text, the optional
/// drawing image with its framing text, and finally the output contract.
pub fn build_parts(estimate: &UploadedFile, drawing: Option<&UploadedFile>) -> Vec<Part> {
    let mut parts = Vec::with_capacity(5);

    parts.push(inline_part(estimate));
    parts.push(Part::text(ESTIMATE_CONTEXT));

    if let Some(drawing) = drawing {
        parts.push(inline_part(drawing));
        parts.push(Part::text(DRAWING_CONTEXT));
    }

    parts.push(Part::text(OUTPUT_CONTRACT));
    parts
}

fn inline_part(file: &UploadedFile) -> Part {
    Part::inline(STANDARD.encode(&file.bytes), file.mime_type.as_str())
}

/// Runs one analysis. Returns the model's JSON exactly as parsed.
///
/// A missing estimate short-circuits before the generator is touched.
pub async fn analyze(
    generator: &dyn Generator,
    upload: &UploadRequest,
) -> Result<Value, AnalysisError> {
    let estimate = upload.estimate.as_ref().ok_or(AnalysisError::MissingInput)?;

    let parts = build_parts(estimate, upload.drawing.as_ref());
    debug!("Calling generator with {} parts", parts.len());

    let text = generator.generate(&parts).await?;
    let cleaned = strip_json_fences(&text);
    let parsed: Value = serde_json::from_str(&cleaned)?;

    match AnalysisResult::deserialize(&parsed) {
        Ok(result) => info!("Analysis produced {} negotiable items", result.items.len()),
        Err(e) => warn!("Model JSON does not match the item schema, passing through: {e}"),
    }

    Ok(parsed)
}
