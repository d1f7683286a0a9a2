//! Axum route handlers for the Interview API.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::orchestrator::{SessionCompletion, SessionSnapshot, SessionStart, TurnResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct InitializeRequest {
    #[serde(default)]
    pub force_restart: bool,
}

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub utterance: String,
}

/// Success envelope: `{"success": true, ...payload}`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Success<T> {
    fn new(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews/:uuid/session
///
/// Starts the interview and returns the opening message. Returns the existing
/// session unchanged unless `force_restart` is set. An empty body means defaults.
pub async fn handle_initialize(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
    body: Bytes,
) -> Result<Json<Success<SessionStart>>, AppError> {
    let request = parse_initialize(&body)?;
    let start = state
        .orchestrator
        .initialize_session(uuid, request.force_restart)
        .await?;
    Ok(Success::new(start))
}

fn parse_initialize(body: &[u8]) -> Result<InitializeRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(InitializeRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid initialize request body: {e}")))
}

/// GET /api/v1/interviews/:uuid/session
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<Success<SessionSnapshot>>, AppError> {
    let snapshot = state.orchestrator.get_state(uuid).await?;
    Ok(Success::new(snapshot))
}

/// POST /api/v1/interviews/:uuid/turns
///
/// Processes one candidate utterance and returns the interviewer's reply.
pub async fn handle_turn(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<Success<TurnResult>>, AppError> {
    if request.utterance.trim().is_empty() {
        return Err(AppError::Validation("utterance cannot be empty".to_string()));
    }
    let turn = state
        .orchestrator
        .process_turn(uuid, &request.utterance)
        .await?;
    Ok(Success::new(turn))
}

/// POST /api/v1/interviews/:uuid/complete
pub async fn handle_complete(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<Success<SessionCompletion>>, AppError> {
    let completion = state.orchestrator.complete_session(uuid).await?;
    Ok(Success::new(completion))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_uses_defaults() {
        assert!(!parse_initialize(b"").unwrap().force_restart);
        assert!(!parse_initialize(b"  \n").unwrap().force_restart);
    }

    #[test]
    fn test_force_restart_is_read_from_body() {
        assert!(parse_initialize(br#"{"force_restart": true}"#).unwrap().force_restart);
        assert!(!parse_initialize(b"{}").unwrap().force_restart);
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        assert!(matches!(
            parse_initialize(b"{force_restart: yes"),
            Err(AppError::Validation(_))
        ));
    }
}
