#![allow(dead_code)]

//! Session data model: everything here round-trips through plain JSON so a
//! persisted record can be reloaded by another process.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interview::interpreter::ModelReply;

// ────────────────────────────────────────────────────────────────────────────
// Phase
// ────────────────────────────────────────────────────────────────────────────

/// Stage of the interview conversation.
///
/// Flows strictly forward:
/// `Introduction` → `CandidateIntro` → `Questions` → `FinalQuestions` → `Closing` → `Completed`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    #[default]
    Introduction,
    CandidateIntro,
    Questions,
    FinalQuestions,
    Closing,
    Completed,
}

impl InterviewPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Introduction => "Introduction",
            Self::CandidateIntro => "Candidate Introduction",
            Self::Questions => "Structured Questions",
            Self::FinalQuestions => "Candidate Questions",
            Self::Closing => "Closing",
            Self::Completed => "Completed",
        }
    }

    /// Position in the forward order. Used to assert monotonic progress.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Introduction => 0,
            Self::CandidateIntro => 1,
            Self::Questions => 2,
            Self::FinalQuestions => 3,
            Self::Closing => 4,
            Self::Completed => 5,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Interview state
// ────────────────────────────────────────────────────────────────────────────

/// One entry of the append-only question history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub question_id: String,
    pub category_type: Option<String>,
    pub question: String,
    pub asked: bool,
    pub answered: bool,
    pub is_repeat: bool,
    pub is_clarification: bool,
    pub timestamp: DateTime<Utc>,
    pub user_response: String,
    pub feedback: String,
}

/// Per-application interview state, owned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewState {
    pub current_phase: InterviewPhase,
    pub current_question_index: u32,
    pub total_questions: u32,
    /// Configured category order. Drives which category comes next.
    pub category_order: Vec<String>,
    pub questions_asked_by_category: BTreeMap<String, u32>,
    pub max_questions_per_category: BTreeMap<String, u32>,
    pub completed_categories: Vec<String>,
    pub current_category: Option<String>,
    pub question_history: Vec<QuestionRecord>,
    pub clarification_requests: u32,
    pub actual_questions_asked: u32,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub estimated_completion: DateTime<Utc>,
    pub is_waiting_for_final_questions: bool,
}

impl InterviewState {
    /// Builds a fresh state from the job's category configuration.
    ///
    /// Categories with a zero budget are skipped. A `total_questions` of zero
    /// falls back to the sum of category budgets.
    pub fn new(
        categories: &[CategoryConfig],
        total_questions: u32,
        started_at: DateTime<Utc>,
        estimated_completion: DateTime<Utc>,
    ) -> Self {
        let mut category_order = Vec::new();
        let mut max_questions_per_category = BTreeMap::new();
        let mut questions_asked_by_category = BTreeMap::new();

        for config in categories.iter().filter(|c| c.number_of_questions > 0) {
            if max_questions_per_category.contains_key(&config.category_type) {
                continue;
            }
            category_order.push(config.category_type.clone());
            max_questions_per_category.insert(config.category_type.clone(), config.number_of_questions);
            questions_asked_by_category.insert(config.category_type.clone(), 0);
        }

        let total_questions = if total_questions > 0 {
            total_questions
        } else {
            max_questions_per_category.values().sum()
        };

        Self {
            current_phase: InterviewPhase::Introduction,
            current_question_index: 0,
            total_questions,
            current_category: category_order.first().cloned(),
            category_order,
            questions_asked_by_category,
            max_questions_per_category,
            completed_categories: Vec::new(),
            question_history: Vec::new(),
            clarification_requests: 0,
            actual_questions_asked: 0,
            started_at,
            last_activity_at: started_at,
            estimated_completion,
            is_waiting_for_final_questions: false,
        }
    }

    pub fn asked_in(&self, category: &str) -> u32 {
        self.questions_asked_by_category.get(category).copied().unwrap_or(0)
    }

    pub fn max_for(&self, category: &str) -> u32 {
        self.max_questions_per_category.get(category).copied().unwrap_or(0)
    }

    pub fn all_categories_complete(&self) -> bool {
        self.current_category.is_none()
    }

    pub fn progress(&self) -> ProgressInfo {
        let percent_complete = if self.current_phase == InterviewPhase::Completed {
            100
        } else if self.total_questions == 0 {
            0
        } else {
            ((self.actual_questions_asked.min(self.total_questions) * 100) / self.total_questions)
                .min(100)
        };

        ProgressInfo {
            current_phase: self.current_phase,
            actual_questions_asked: self.actual_questions_asked,
            total_questions: self.total_questions,
            current_category: self.current_category.clone(),
            completed_categories: self.completed_categories.clone(),
            clarification_requests: self.clarification_requests,
            percent_complete,
        }
    }
}

/// Progress snapshot returned to callers after every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInfo {
    pub current_phase: InterviewPhase,
    pub actual_questions_asked: u32,
    pub total_questions: u32,
    pub current_category: Option<String>,
    pub completed_categories: Vec<String>,
    pub clarification_requests: u32,
    pub percent_complete: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Transcript
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    Assistant,
    User,
}

/// One transcript turn. The transcript is append-only and chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// The question portion of an assistant message, without the feedback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_repeat: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_clarification: Option<bool>,
}

impl ConversationMessage {
    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp,
            question: None,
            question_id: None,
            category_type: None,
            is_repeat: None,
            is_clarification: None,
        }
    }

    /// An assistant message carrying its question separately.
    pub fn interviewer(reply: &ModelReply, timestamp: DateTime<Utc>) -> Self {
        let question = reply.next_question.trim();
        Self {
            question: (!question.is_empty()).then(|| question.to_string()),
            ..Self::assistant(reply.spoken(), timestamp)
        }
    }

    /// The question to repeat or record: the separate question when present,
    /// the whole message otherwise.
    pub fn asked_question(&self) -> &str {
        self.question.as_deref().unwrap_or(&self.content)
    }

    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: MessageRole::User,
            ..Self::assistant(content, timestamp)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Context handed over by the application record
// ────────────────────────────────────────────────────────────────────────────

/// A question category and its quota, as configured on the job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConfig {
    #[serde(rename = "type")]
    pub category_type: String,
    pub number_of_questions: u32,
}

/// Job details embedded into every prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobContext {
    pub title: String,
    pub skills: Vec<String>,
    pub description: String,
    pub requirements: String,
    pub benefits: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateContext {
    pub name: String,
    pub email: String,
}

impl CandidateContext {
    /// First name for a conversational address, falling back to a neutral term.
    pub fn display_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("the candidate")
    }
}
