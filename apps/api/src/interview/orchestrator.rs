//! Interview Session Orchestrator: one pass per candidate turn.
//!
//! Flow: load → classify → budget → phase → compose prompt → model call →
//!       interpret → persist.
//!
//! All mutation happens on a working copy of the stored state. Nothing is
//! written unless the whole pass succeeds, and the write is a single
//! `PendingUpdate`.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::budget;
use crate::interview::classifier::{IntentClassifier, IntentPhrases};
use crate::interview::composer::{PromptComposer, PromptInput, PromptVariant};
use crate::interview::interpreter::{default_reply, interpret, ModelReply};
use crate::interview::models::{
    ConversationMessage, InterviewPhase, InterviewState, MessageRole, ProgressInfo, QuestionRecord,
};
use crate::interview::phase::{self, Transition};
use crate::interview::prompts::{
    COMPLETED_MESSAGE, FALLBACK_ANY_OTHER_QUESTIONS, FALLBACK_CANDIDATE_INTRO, FALLBACK_CLARIFICATION_FEEDBACK,
    FALLBACK_CLOSING, FALLBACK_FEEDBACK, FALLBACK_FINAL_QUESTIONS, FALLBACK_FINAL_QUESTIONS_ACK,
    FALLBACK_INTRODUCTION, FALLBACK_READY_ACK, FALLBACK_READY_QUESTION, INTERVIEWER_SYSTEM, fill_template,
};
use crate::interview::store::{PendingUpdate, SessionStore};
use crate::llm_client::{GenerationRequest, TextGenerator};
use crate::models::application::{ApplicationRecord, SessionStatus};

/// Sampling settings for conversational turns.
const TURN_TEMPERATURE: f32 = 0.7;
const TURN_MAX_TOKENS: u32 = 500;
/// Closing remarks are shorter and steadier.
const CLOSING_TEMPERATURE: f32 = 0.5;
const CLOSING_MAX_TOKENS: u32 = 300;

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStart {
    pub state: InterviewState,
    pub first_message: String,
    /// True when an existing session was returned unchanged.
    pub resumed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResult {
    pub feedback: String,
    pub next_question: String,
    pub state: InterviewState,
    pub is_completed: bool,
    pub progress_info: ProgressInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: Option<InterviewState>,
    pub transcript: Vec<ConversationMessage>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCompletion {
    pub final_message: String,
    pub state: InterviewState,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

pub struct InterviewOrchestrator {
    store: Arc<dyn SessionStore>,
    generator: Arc<dyn TextGenerator>,
    classifier: IntentClassifier,
    composer: PromptComposer,
    default_session_minutes: u32,
}

impl InterviewOrchestrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        generator: Arc<dyn TextGenerator>,
        default_session_minutes: u32,
    ) -> Self {
        Self {
            store,
            generator,
            classifier: IntentClassifier::default(),
            composer: PromptComposer::default(),
            default_session_minutes,
        }
    }

    /// Replaces the classifier's phrase lists, e.g. for another locale.
    pub fn with_phrases(mut self, phrases: IntentPhrases) -> Self {
        self.classifier = IntentClassifier::new(phrases);
        self
    }

    /// Starts the interview, or returns the existing session unless `force_restart`.
    pub async fn initialize_session(
        &self,
        uuid: Uuid,
        force_restart: bool,
    ) -> Result<SessionStart, AppError> {
        let record = self.load(uuid).await?;

        if let (Some(state), false) = (&record.interview_state, force_restart) {
            let first_message = record
                .interview_conversation
                .iter()
                .find(|m| m.role == MessageRole::Assistant)
                .map(|m| m.content.clone())
                .unwrap_or_default();
            return Ok(SessionStart {
                state: state.clone(),
                first_message,
                resumed: true,
            });
        }

        let now = Utc::now();
        let minutes = record
            .session_instruction
            .duration
            .filter(|d| *d > 0)
            .unwrap_or(self.default_session_minutes);
        let instructions = &record.instructions_for_ai;
        let state = InterviewState::new(
            &instructions.category_configs,
            instructions.total_questions,
            now,
            now + Duration::minutes(i64::from(minutes)),
        );

        let reply = self
            .generate_reply(
                InterviewPhase::Introduction,
                &PromptInput {
                    variant: PromptVariant::Introduction,
                    state: &state,
                    job: &record.job_details,
                    candidate: &record.candidate,
                    conversation: &[],
                    suggested_questions: &instructions.questions,
                },
                None,
            )
            .await;
        let opening = ConversationMessage::interviewer(&reply, now);
        let first_message = opening.content.clone();

        self.store
            .apply(
                uuid,
                PendingUpdate {
                    state: state.clone(),
                    appended_messages: vec![opening],
                    replace_transcript: true,
                    status: SessionStatus::InProgress,
                    expected_version: record.state_version,
                },
            )
            .await?;

        info!(
            "Initialized interview {uuid}: {} questions across {} categories (restart={force_restart})",
            state.total_questions,
            state.category_order.len()
        );

        Ok(SessionStart {
            state,
            first_message,
            resumed: false,
        })
    }

    /// Processes one candidate utterance end to end.
    pub async fn process_turn(&self, uuid: Uuid, utterance: &str) -> Result<TurnResult, AppError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(AppError::Validation("utterance cannot be empty".to_string()));
        }

        let record = self.load(uuid).await?;
        let stored = record.interview_state.as_ref().ok_or_else(|| {
            AppError::Validation(format!("Interview for application {uuid} has not been started"))
        })?;
        if stored.current_phase.is_terminal() {
            return Err(AppError::Validation(format!(
                "Interview for application {uuid} is already completed"
            )));
        }

        let now = Utc::now();
        let intent = self.classifier.classify(utterance);
        let declines = self.classifier.declines_further_questions(utterance);

        let mut working = stored.clone();
        let answered_phase = working.current_phase;
        let answered_category = working.current_category.clone();
        let answered_question_id =
            (answered_phase == InterviewPhase::Questions).then(|| pending_question_id(&working));

        if intent.is_clarification {
            working.clarification_requests += 1;
        }
        if answered_phase == InterviewPhase::Questions && intent.is_genuine_answer() {
            let outcome = budget::advance(&mut working);
            if let Some(category) = &outcome.charged_category {
                debug!("Interview {uuid}: answer charged to '{category}'");
            }
            if let Some(category) = &outcome.completed_category {
                info!("Interview {uuid}: category '{category}' completed");
            }
        }

        let transition = phase::next_phase(&working, &intent, declines);
        phase::apply(&mut working, transition);
        working.last_activity_at = now;

        let mut user_message = ConversationMessage::user(utterance, now);
        user_message.question_id = answered_question_id.clone();
        user_message.category_type = answered_category
            .clone()
            .filter(|_| answered_phase == InterviewPhase::Questions);
        user_message.is_clarification = Some(intent.is_clarification);

        let previous_question = record
            .interview_conversation
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
            .map(|m| m.asked_question().to_string());

        let mut conversation = record.interview_conversation.clone();
        conversation.push(user_message.clone());

        let reply = match PromptVariant::select(working.current_phase, transition.changed(), &intent) {
            Some(variant) => {
                self.generate_reply(
                    working.current_phase,
                    &PromptInput {
                        variant,
                        state: &working,
                        job: &record.job_details,
                        candidate: &record.candidate,
                        conversation: &conversation,
                        suggested_questions: &record.instructions_for_ai.questions,
                    },
                    previous_question.as_deref(),
                )
                .await
            }
            None => ModelReply {
                feedback: COMPLETED_MESSAGE.to_string(),
                next_question: String::new(),
            },
        };

        if let Some(question_id) = answered_question_id {
            working.question_history.push(QuestionRecord {
                question_id,
                category_type: answered_category,
                question: previous_question.unwrap_or_default(),
                asked: true,
                answered: intent.is_genuine_answer(),
                is_repeat: intent.is_clarification,
                is_clarification: intent.is_clarification,
                timestamp: now,
                user_response: utterance.to_string(),
                feedback: reply.feedback.clone(),
            });
        }

        let mut assistant_message = ConversationMessage::interviewer(&reply, Utc::now());
        if working.current_phase == InterviewPhase::Questions {
            assistant_message.question_id = Some(pending_question_id(&working));
            assistant_message.category_type = working.current_category.clone();
            assistant_message.is_repeat = Some(intent.is_clarification);
        }

        let is_completed = working.current_phase == InterviewPhase::Completed;
        let status = if is_completed {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        };

        self.store
            .apply(
                uuid,
                PendingUpdate {
                    state: working.clone(),
                    appended_messages: vec![user_message, assistant_message],
                    replace_transcript: false,
                    status,
                    expected_version: record.state_version,
                },
            )
            .await?;

        info!(
            "Interview {uuid}: {:?} -> {:?} (clarification={}, asked {}/{})",
            transition.from,
            transition.to,
            intent.is_clarification,
            working.actual_questions_asked,
            working.total_questions
        );

        Ok(TurnResult {
            feedback: reply.feedback,
            next_question: reply.next_question,
            progress_info: working.progress(),
            state: working,
            is_completed,
        })
    }

    /// Returns the stored state and transcript.
    pub async fn get_state(&self, uuid: Uuid) -> Result<SessionSnapshot, AppError> {
        let record = self.load(uuid).await?;
        Ok(SessionSnapshot {
            state: record.interview_state,
            transcript: record.interview_conversation,
            status: record.status,
        })
    }

    /// Ends the interview explicitly. Idempotent once the session is completed.
    pub async fn complete_session(&self, uuid: Uuid) -> Result<SessionCompletion, AppError> {
        let record = self.load(uuid).await?;
        let stored = record.interview_state.as_ref().ok_or_else(|| {
            AppError::Validation(format!("Interview for application {uuid} has not been started"))
        })?;

        if stored.current_phase.is_terminal() {
            let final_message = record
                .interview_conversation
                .iter()
                .rev()
                .find(|m| m.role == MessageRole::Assistant)
                .map(|m| m.content.clone())
                .unwrap_or_else(|| COMPLETED_MESSAGE.to_string());
            return Ok(SessionCompletion {
                final_message,
                state: stored.clone(),
            });
        }

        let mut working = stored.clone();
        let from = working.current_phase;
        if from != InterviewPhase::Closing {
            phase::apply(
                &mut working,
                Transition {
                    from,
                    to: InterviewPhase::Closing,
                },
            );
        }

        let reply = self
            .generate_reply(
                InterviewPhase::Closing,
                &PromptInput {
                    variant: PromptVariant::Closing,
                    state: &working,
                    job: &record.job_details,
                    candidate: &record.candidate,
                    conversation: &record.interview_conversation,
                    suggested_questions: &[],
                },
                None,
            )
            .await;

        phase::close_out(&mut working);
        let now = Utc::now();
        working.last_activity_at = now;
        let final_message = reply.spoken();

        self.store
            .apply(
                uuid,
                PendingUpdate {
                    state: working.clone(),
                    appended_messages: vec![ConversationMessage::assistant(final_message.clone(), now)],
                    replace_transcript: false,
                    status: SessionStatus::Completed,
                    expected_version: record.state_version,
                },
            )
            .await?;

        info!("Interview {uuid} completed explicitly from {from:?}");

        Ok(SessionCompletion {
            final_message,
            state: working,
        })
    }

    async fn load(&self, uuid: Uuid) -> Result<ApplicationRecord, AppError> {
        self.store
            .load(uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {uuid} not found")))
    }

    /// Calls the model and interprets its reply. A failed call degrades to
    /// scripted text for the variant; it is logged, never surfaced.
    async fn generate_reply(
        &self,
        phase: InterviewPhase,
        input: &PromptInput<'_>,
        previous_question: Option<&str>,
    ) -> ModelReply {
        let (temperature, max_tokens) = match input.variant {
            PromptVariant::Closing => (CLOSING_TEMPERATURE, CLOSING_MAX_TOKENS),
            _ => (TURN_TEMPERATURE, TURN_MAX_TOKENS),
        };
        let request = GenerationRequest {
            prompt: self.composer.build_prompt(input),
            system: INTERVIEWER_SYSTEM.to_string(),
            temperature,
            max_tokens,
        };

        match self.generator.generate(&request).await {
            Ok(text) => {
                let interpretation = interpret(
                    phase,
                    &text,
                    input.variant.expects_question_first(),
                    &input.job.title,
                );
                if interpretation.is_fallback() {
                    debug!("Fallback reply for {:?}: {:?}", input.variant, interpretation.reply());
                }
                interpretation.into_reply()
            }
            Err(e) => {
                warn!(
                    "Model call failed during {:?}, using fallback reply: {e}",
                    input.variant
                );
                fallback_reply(input, previous_question)
            }
        }
    }
}

/// Id of the question currently awaiting an answer, e.g. `technical-q2`.
fn pending_question_id(state: &InterviewState) -> String {
    match state.current_category.as_deref() {
        Some(category) => format!("{category}-q{}", state.asked_in(category) + 1),
        None => format!("general-q{}", state.actual_questions_asked + 1),
    }
}

/// Scripted text per variant, used when the model call fails.
fn fallback_reply(input: &PromptInput<'_>, previous_question: Option<&str>) -> ModelReply {
    let title = input.job.title.trim();
    let name = input.candidate.display_name();
    let reply = |feedback: &str, next_question: &str| ModelReply {
        feedback: feedback.to_string(),
        next_question: next_question.to_string(),
    };

    match input.variant {
        PromptVariant::Introduction => ModelReply {
            feedback: fill_template(
                FALLBACK_INTRODUCTION,
                &[
                    ("candidate_name", name),
                    ("job_title", if title.is_empty() { "open" } else { title }),
                ],
            ),
            next_question: FALLBACK_READY_QUESTION.to_string(),
        },
        PromptVariant::CandidateIntro { clarification: false } => {
            reply(FALLBACK_READY_ACK, FALLBACK_CANDIDATE_INTRO)
        }
        PromptVariant::CandidateIntro { clarification: true } => {
            reply(FALLBACK_CLARIFICATION_FEEDBACK, FALLBACK_CANDIDATE_INTRO)
        }
        PromptVariant::Questions {
            clarification: true,
            ..
        } => match previous_question.map(str::trim).filter(|q| !q.is_empty()) {
            Some(question) => reply(FALLBACK_CLARIFICATION_FEEDBACK, question),
            None => default_reply(title),
        },
        PromptVariant::Questions { .. } => default_reply(title),
        PromptVariant::FinalQuestionsOffer => reply(FALLBACK_FEEDBACK, FALLBACK_FINAL_QUESTIONS),
        PromptVariant::FinalQuestionsAck => {
            reply(FALLBACK_FINAL_QUESTIONS_ACK, FALLBACK_ANY_OTHER_QUESTIONS)
        }
        PromptVariant::Closing => reply(&fill_template(FALLBACK_CLOSING, &[("candidate_name", name)]), ""),
    }
}
