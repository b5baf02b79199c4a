use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmProvider;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one provider selected at startup. Handlers never branch on which.
    pub llm: Arc<dyn LlmProvider>,
    pub sessions: SessionStore,
    pub config: Config,
}
