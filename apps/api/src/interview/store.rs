//! Session Persistence Adapter: loads application records and writes a turn's
//! result as one atomic update.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{ConversationMessage, InterviewState};
use crate::models::application::{ApplicationRecord, ApplicationRow, SessionStatus};

/// Everything one orchestration pass writes, assembled before any I/O happens.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpdate {
    pub state: InterviewState,
    pub appended_messages: Vec<ConversationMessage>,
    /// Set on (re)initialization: the transcript becomes `appended_messages`.
    pub replace_transcript: bool,
    pub status: SessionStatus,
    /// `state_version` the update was computed from.
    pub expected_version: i64,
}

/// Storage seam. Carried by the orchestrator as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, uuid: Uuid) -> Result<Option<ApplicationRecord>, AppError>;

    /// Applies the update atomically. Fails with `AppError::Conflict` when the
    /// stored version no longer matches `expected_version`.
    async fn apply(&self, uuid: Uuid, update: PendingUpdate) -> Result<(), AppError>;
}

/// PostgreSQL-backed store over the `job_applications` table.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn load(&self, uuid: Uuid) -> Result<Option<ApplicationRecord>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT uuid, status, candidate, job_details, instructions_for_ai,
                   session_instruction, interview_state, interview_conversation,
                   state_version, created_at, updated_at
            FROM job_applications
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ApplicationRecord::try_from)
            .transpose()
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "Application {uuid} has a malformed interview record: {e}"
                ))
            })
    }

    async fn apply(&self, uuid: Uuid, update: PendingUpdate) -> Result<(), AppError> {
        let state = serde_json::to_value(&update.state).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to serialize InterviewState: {e}"))
        })?;
        let messages = serde_json::to_value(&update.appended_messages).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to serialize transcript: {e}"))
        })?;

        // Single statement: state, transcript append and status move together.
        let result = sqlx::query(
            r#"
            UPDATE job_applications
            SET interview_state = $2,
                interview_conversation = CASE
                    WHEN $3 THEN $4::jsonb
                    ELSE COALESCE(interview_conversation, '[]'::jsonb) || $4::jsonb
                END,
                status = $5,
                state_version = state_version + 1,
                updated_at = NOW()
            WHERE uuid = $1 AND state_version = $6
            "#,
        )
        .bind(uuid)
        .bind(&state)
        .bind(update.replace_transcript)
        .bind(&messages)
        .bind(update.status.as_str())
        .bind(update.expected_version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "Interview session {uuid} was updated by another request; retry the turn"
            )));
        }

        info!(
            "Persisted interview {uuid}: phase={:?}, +{} messages, version {}",
            update.state.current_phase,
            update.appended_messages.len(),
            update.expected_version + 1
        );
        Ok(())
    }
}
