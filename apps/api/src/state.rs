use std::sync::Arc;

use crate::interview::orchestrator::InterviewOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the session store and the model client.
    pub orchestrator: Arc<InterviewOrchestrator>,
}
