//! Test doubles: an in-memory `SessionStore` and a scripted `TextGenerator`.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{CandidateContext, CategoryConfig, JobContext};
use crate::interview::store::{PendingUpdate, SessionStore};
use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};
use crate::models::application::{ApplicationRecord, InstructionsForAi, SessionInstruction};

#[derive(Default)]
pub struct InMemorySessionStore {
    records: Mutex<HashMap<Uuid, ApplicationRecord>>,
    fail_writes: Mutex<bool>,
}

impl InMemorySessionStore {
    pub fn with_record(record: ApplicationRecord) -> Self {
        let store = Self::default();
        store.insert(record);
        store
    }

    pub fn insert(&self, record: ApplicationRecord) {
        self.records.lock().unwrap().insert(record.uuid, record);
    }

    pub fn get(&self, uuid: Uuid) -> ApplicationRecord {
        self.records.lock().unwrap()[&uuid].clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    /// Simulates another request committing a write for `uuid`.
    pub fn bump_version(&self, uuid: Uuid) {
        if let Some(record) = self.records.lock().unwrap().get_mut(&uuid) {
            record.state_version += 1;
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, uuid: Uuid) -> Result<Option<ApplicationRecord>, AppError> {
        Ok(self.records.lock().unwrap().get(&uuid).cloned())
    }

    async fn apply(&self, uuid: Uuid, update: PendingUpdate) -> Result<(), AppError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(&uuid)
            .ok_or_else(|| AppError::NotFound(format!("Application {uuid} not found")))?;
        if record.state_version != update.expected_version {
            return Err(AppError::Conflict(format!("stale version for {uuid}")));
        }
        record.interview_state = Some(update.state);
        if update.replace_transcript {
            record.interview_conversation = update.appended_messages;
        } else {
            record.interview_conversation.extend(update.appended_messages);
        }
        record.status = update.status.as_str().to_string();
        record.state_version += 1;
        Ok(())
    }
}

/// Replays queued replies in order; `None` entries, or an empty queue, fail the call.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Option<String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(Into::into)).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or(LlmError::EmptyContent)
    }
}

/// Commits a competing write to the store while the model call is in flight.
pub struct RacingGenerator {
    pub store: Arc<InMemorySessionStore>,
    pub uuid: Uuid,
    pub reply: String,
}

#[async_trait]
impl TextGenerator for RacingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, LlmError> {
        self.store.bump_version(self.uuid);
        Ok(self.reply.clone())
    }
}

/// A JSON reply in the shape the interpreter expects.
pub fn json_reply(feedback: &str, next_question: &str) -> String {
    serde_json::json!({"feedback": feedback, "nextQuestion": next_question}).to_string()
}

pub fn application(categories: &[(&str, u32)], total_questions: u32) -> ApplicationRecord {
    ApplicationRecord {
        uuid: Uuid::new_v4(),
        status: "invited".to_string(),
        candidate: CandidateContext {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        },
        job_details: JobContext {
            title: "Senior Rust Engineer".to_string(),
            skills: vec!["Rust".to_string(), "Tokio".to_string()],
            description: "Build the core data plane.".to_string(),
            requirements: "Systems programming".to_string(),
            benefits: "Remote-first".to_string(),
        },
        instructions_for_ai: InstructionsForAi {
            total_questions,
            category_configs: categories
                .iter()
                .map(|(t, n)| CategoryConfig {
                    category_type: t.to_string(),
                    number_of_questions: *n,
                })
                .collect(),
            questions: vec![],
        },
        session_instruction: SessionInstruction { duration: Some(20) },
        interview_state: None,
        interview_conversation: vec![],
        state_version: 0,
    }
}
