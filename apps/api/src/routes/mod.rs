pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview session API
        .route(
            "/api/v1/interviews/:uuid/session",
            post(handlers::handle_initialize).get(handlers::handle_get_session),
        )
        .route("/api/v1/interviews/:uuid/turns", post(handlers::handle_turn))
        .route(
            "/api/v1/interviews/:uuid/complete",
            post(handlers::handle_complete),
        )
        .with_state(state)
}
