// Estimate analysis: multipart upload → multimodal prompt → Gemini → fenced-JSON cleanup.
// All model calls go through llm_client::Generator; nothing here talks HTTP to Gemini.

pub mod handlers;
pub mod prompts;
pub mod sanitize;
pub mod service;
