#![allow(dead_code)]

//! The job application record the orchestrator reads and writes.
//!
//! Most of it belongs to the surrounding application (job setup, invitations);
//! the orchestrator only owns `interview_state`, `interview_conversation` and `status`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::interview::models::{
    CandidateContext, CategoryConfig, ConversationMessage, InterviewState, JobContext,
};

/// Raw `job_applications` row. JSONB columns are decoded into `ApplicationRecord`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub uuid: Uuid,
    pub status: String,
    pub candidate: Value,
    pub job_details: Value,
    pub instructions_for_ai: Value,
    pub session_instruction: Option<Value>,
    pub interview_state: Option<Value>,
    pub interview_conversation: Value,
    pub state_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Interview configuration set on the job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstructionsForAi {
    pub total_questions: u32,
    pub category_configs: Vec<CategoryConfig>,
    /// Predefined questions the interviewer may draw on.
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionInstruction {
    /// Planned session length in minutes.
    pub duration: Option<u32>,
}

/// Status values the orchestrator writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }
}

/// Decoded application record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub uuid: Uuid,
    pub status: String,
    pub candidate: CandidateContext,
    pub job_details: JobContext,
    pub instructions_for_ai: InstructionsForAi,
    pub session_instruction: SessionInstruction,
    pub interview_state: Option<InterviewState>,
    pub interview_conversation: Vec<ConversationMessage>,
    /// Optimistic concurrency counter, bumped on every orchestrator write.
    pub state_version: i64,
}

impl TryFrom<ApplicationRow> for ApplicationRecord {
    type Error = serde_json::Error;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            uuid: row.uuid,
            status: row.status,
            candidate: serde_json::from_value(row.candidate)?,
            job_details: serde_json::from_value(row.job_details)?,
            instructions_for_ai: serde_json::from_value(row.instructions_for_ai)?,
            session_instruction: row
                .session_instruction
                .map(serde_json::from_value)
                .transpose()?
                .unwrap_or_default(),
            interview_state: row
                .interview_state
                .filter(|v| !v.is_null())
                .map(serde_json::from_value)
                .transpose()?,
            interview_conversation: if row.interview_conversation.is_null() {
                Vec::new()
            } else {
                serde_json::from_value(row.interview_conversation)?
            },
            state_version: row.state_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row() -> ApplicationRow {
        ApplicationRow {
            uuid: Uuid::new_v4(),
            status: "invited".to_string(),
            candidate: json!({"name": "Grace Hopper", "email": "grace@example.com"}),
            job_details: json!({
                "title": "Platform Engineer",
                "skills": ["Rust", "Go"],
                "description": "Own the platform",
                "requirements": "Distributed systems",
                "benefits": "Remote"
            }),
            instructions_for_ai: json!({
                "totalQuestions": 4,
                "categoryConfigs": [
                    {"type": "technical", "numberOfQuestions": 3},
                    {"type": "behavioral", "numberOfQuestions": 1}
                ],
                "questions": ["Tell me about a hard bug."]
            }),
            session_instruction: Some(json!({"duration": 45})),
            interview_state: None,
            interview_conversation: json!([]),
            state_version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_decodes_into_record() {
        let record = ApplicationRecord::try_from(row()).unwrap();
        assert_eq!(record.candidate.name, "Grace Hopper");
        assert_eq!(record.job_details.skills, vec!["Rust", "Go"]);
        assert_eq!(record.instructions_for_ai.total_questions, 4);
        assert_eq!(record.instructions_for_ai.category_configs.len(), 2);
        assert_eq!(record.session_instruction.duration, Some(45));
        assert!(record.interview_state.is_none());
        assert!(record.interview_conversation.is_empty());
    }

    #[test]
    fn test_missing_optional_json_uses_defaults() {
        let mut r = row();
        r.session_instruction = None;
        r.interview_state = Some(Value::Null);
        r.interview_conversation = Value::Null;
        r.job_details = json!({"title": "Platform Engineer"});
        let record = ApplicationRecord::try_from(r).unwrap();
        assert_eq!(record.session_instruction.duration, None);
        assert!(record.interview_state.is_none());
        assert!(record.job_details.skills.is_empty());
    }

    #[test]
    fn test_malformed_state_is_an_error() {
        let mut r = row();
        r.interview_state = Some(json!({"currentPhase": "teleporting"}));
        assert!(ApplicationRecord::try_from(r).is_err());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(SessionStatus::InProgress.as_str(), "in_progress");
        assert_eq!(SessionStatus::Completed.as_str(), "completed");
    }
}
