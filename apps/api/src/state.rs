use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Generator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data: every analysis is independent.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Default: GeminiClient. Tests swap in a stub.
    pub generator: Arc<dyn Generator>,
    pub config: Config,
}
