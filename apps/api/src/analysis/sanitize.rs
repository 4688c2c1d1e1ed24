//! Cleanup of model text before JSON parsing.

/// Removes every ```` ```json ```` and ```` ``` ```` marker anywhere in the
/// text, then trims surrounding whitespace.
///
/// Deliberately permissive: fences are dropped wherever they appear, not only
/// when they wrap the whole payload. Applying it twice changes nothing.
pub fn strip_json_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
