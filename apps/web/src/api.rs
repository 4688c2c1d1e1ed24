//! Analysis API call
//!
//! Posts the selected files as multipart form data to the same-origin API.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

use crate::models::AnalyzeResponse;

const ANALYZE_URL: &str = "/api/analyze";
const ESTIMATE_FIELD: &str = "estimateFile";
const DRAWING_FIELD: &str = "drawingFile";

/// Sends one analysis request. `Err` covers transport failures and bodies
/// that are not JSON; a `success: false` answer is still `Ok`.
pub async fn analyze(estimate: &File, drawing: Option<&File>) -> Result<AnalyzeResponse, String> {
    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename(ESTIMATE_FIELD, estimate, &estimate.name())
        .map_err(js_error)?;
    if let Some(drawing) = drawing {
        form.append_with_blob_and_filename(DRAWING_FIELD, drawing, &drawing.name())
            .map_err(js_error)?;
    }

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&form);
    let request = Request::new_with_str_and_init(ANALYZE_URL, &init).map_err(js_error)?;

    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    let body = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| "response body is not text".to_string())?;

    decode_response(&body)
}

/// Parses the response body. Any HTTP status is accepted; only the JSON matters.
pub fn decode_response(body: &str) -> Result<AnalyzeResponse, String> {
    serde_json::from_str(body).map_err(|e| format!("invalid response body: {e}"))
}

fn js_error(value: impl Into<JsValue>) -> String {
    let value = value.into();
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
