//! Prompt Composer: phase-specific instructions wrapped in the full turn prompt.
//!
//! Output is a pure function of its inputs: no clocks, no randomness. The
//! conversation is windowed to the most recent turns to bound prompt size.

use crate::interview::classifier::Intent;
use crate::interview::models::{
    CandidateContext, ConversationMessage, InterviewPhase, InterviewState, JobContext, MessageRole,
};
use crate::interview::prompts::{
    CANDIDATE_INTRO_CLARIFICATION_INSTRUCTIONS, CANDIDATE_INTRO_INSTRUCTIONS, CLOSING_INSTRUCTIONS,
    CLOSING_RESPONSE_FORMAT, FINAL_QUESTIONS_ACK_INSTRUCTIONS, FINAL_QUESTIONS_OFFER_INSTRUCTIONS,
    INTRODUCTION_INSTRUCTIONS, JSON_RESPONSE_FORMAT, QUESTIONS_CLARIFICATION_INSTRUCTIONS,
    QUESTIONS_DEFER_CANDIDATE_QUESTIONS, QUESTIONS_INSTRUCTIONS, TURN_PROMPT_TEMPLATE, fill_template,
};
use crate::llm_client::prompts::{JSON_OBJECT_INSTRUCTION, PLAIN_SPEECH_INSTRUCTION};

/// Number of trailing transcript messages included in a prompt.
pub const DEFAULT_CONVERSATION_WINDOW: usize = 10;

/// Skills listed as the focus of a structured question.
const FOCUS_SKILL_COUNT: usize = 3;

/// Which instruction block a turn uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    Introduction,
    CandidateIntro { clarification: bool },
    Questions { clarification: bool, defer_candidate_questions: bool },
    FinalQuestionsOffer,
    FinalQuestionsAck,
    Closing,
}

impl PromptVariant {
    /// Chooses the block for the phase the turn lands in. `None` for `completed`,
    /// which never calls the model.
    pub fn select(phase: InterviewPhase, entered_this_turn: bool, intent: &Intent) -> Option<Self> {
        match phase {
            InterviewPhase::Introduction => Some(Self::Introduction),
            InterviewPhase::CandidateIntro => Some(Self::CandidateIntro {
                clarification: intent.is_clarification && !entered_this_turn,
            }),
            InterviewPhase::Questions => Some(Self::Questions {
                clarification: intent.is_clarification && !entered_this_turn,
                defer_candidate_questions: intent.is_final_questions_request
                    && !intent.is_clarification,
            }),
            InterviewPhase::FinalQuestions if entered_this_turn || intent.is_clarification => {
                Some(Self::FinalQuestionsOffer)
            }
            InterviewPhase::FinalQuestions => Some(Self::FinalQuestionsAck),
            InterviewPhase::Closing => Some(Self::Closing),
            InterviewPhase::Completed => None,
        }
    }

    /// Whether the model is asked to re-say something rather than react to an answer.
    /// Drives the interpreter's single-sentence routing.
    pub fn expects_question_first(&self) -> bool {
        matches!(
            self,
            Self::CandidateIntro { clarification: true }
                | Self::Questions {
                    clarification: true,
                    ..
                }
                | Self::FinalQuestionsAck
        )
    }
}

/// Everything a prompt is built from.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub variant: PromptVariant,
    pub state: &'a InterviewState,
    pub job: &'a JobContext,
    pub candidate: &'a CandidateContext,
    pub conversation: &'a [ConversationMessage],
    /// Predefined questions from the job configuration.
    pub suggested_questions: &'a [String],
}

#[derive(Debug, Clone)]
pub struct PromptComposer {
    window: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERSATION_WINDOW)
    }
}

impl PromptComposer {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn build_prompt(&self, input: &PromptInput<'_>) -> String {
        let response_format = match input.variant {
            PromptVariant::Closing => format!("{CLOSING_RESPONSE_FORMAT} {PLAIN_SPEECH_INSTRUCTION}"),
            _ => format!("{JSON_RESPONSE_FORMAT}\n{JSON_OBJECT_INSTRUCTION}"),
        };

        let skills = join_or_unspecified(&input.job.skills);
        let asked = input.state.actual_questions_asked.to_string();
        let total = input.state.total_questions.to_string();
        let phase_instructions = self.phase_instructions(input);
        let conversation = self.render_window(input.conversation);

        fill_template(
            TURN_PROMPT_TEMPLATE,
            &[
                ("job_title", or_unspecified(&input.job.title)),
                ("skills", &skills),
                ("job_description", or_unspecified(&input.job.description)),
                ("requirements", or_unspecified(&input.job.requirements)),
                ("candidate_name", or_unspecified(&input.candidate.name)),
                ("phase_label", input.state.current_phase.label()),
                ("asked", &asked),
                ("total", &total),
                ("phase_instructions", &phase_instructions),
                ("conversation", &conversation),
                ("response_format", &response_format),
            ],
        )
    }

    fn phase_instructions(&self, input: &PromptInput<'_>) -> String {
        match input.variant {
            PromptVariant::Introduction => fill_template(
                INTRODUCTION_INSTRUCTIONS,
                &[
                    ("candidate_name", input.candidate.display_name()),
                    ("job_title", or_unspecified(&input.job.title)),
                ],
            ),
            PromptVariant::CandidateIntro { clarification: false } => {
                CANDIDATE_INTRO_INSTRUCTIONS.to_string()
            }
            PromptVariant::CandidateIntro { clarification: true } => {
                CANDIDATE_INTRO_CLARIFICATION_INSTRUCTIONS.to_string()
            }
            PromptVariant::Questions {
                clarification: true,
                ..
            } => QUESTIONS_CLARIFICATION_INSTRUCTIONS.to_string(),
            PromptVariant::Questions {
                clarification: false,
                defer_candidate_questions,
            } => {
                let state = input.state;
                let category = state.current_category.as_deref().unwrap_or("general");
                let focus: Vec<String> = input
                    .job
                    .skills
                    .iter()
                    .take(FOCUS_SKILL_COUNT)
                    .cloned()
                    .collect();
                let category_asked = (state.asked_in(category) + 1).to_string();
                let category_max = state.max_for(category).to_string();
                let focus_skills = join_or_unspecified(&focus);
                let suggestions = render_suggestions(input.suggested_questions, input.conversation);
                let mut text = fill_template(
                    QUESTIONS_INSTRUCTIONS,
                    &[
                        ("category", category),
                        ("category_asked", &category_asked),
                        ("category_max", &category_max),
                        ("focus_skills", &focus_skills),
                        ("suggested_questions", &suggestions),
                    ],
                );
                if defer_candidate_questions {
                    text.push('\n');
                    text.push_str(QUESTIONS_DEFER_CANDIDATE_QUESTIONS);
                }
                text.trim_end().to_string()
            }
            PromptVariant::FinalQuestionsOffer => FINAL_QUESTIONS_OFFER_INSTRUCTIONS.to_string(),
            PromptVariant::FinalQuestionsAck => fill_template(
                FINAL_QUESTIONS_ACK_INSTRUCTIONS,
                &[("benefits", or_unspecified(&input.job.benefits))],
            ),
            PromptVariant::Closing => fill_template(
                CLOSING_INSTRUCTIONS,
                &[("candidate_name", input.candidate.display_name())],
            ),
        }
    }

    fn render_window(&self, conversation: &[ConversationMessage]) -> String {
        let start = conversation.len().saturating_sub(self.window);
        let window = &conversation[start..];
        if window.is_empty() {
            return "(no conversation yet)".to_string();
        }
        window
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    MessageRole::Assistant => "Interviewer",
                    MessageRole::User => "Candidate",
                };
                format!("{speaker}: {}", m.content.trim())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Lists predefined questions the interviewer has not already asked verbatim.
fn render_suggestions(suggested: &[String], conversation: &[ConversationMessage]) -> String {
    let remaining: Vec<&str> = suggested
        .iter()
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .filter(|q| {
            !conversation
                .iter()
                .any(|m| m.role == MessageRole::Assistant && m.content.contains(q))
        })
        .collect();
    if remaining.is_empty() {
        return String::new();
    }
    let mut text = "Suggested questions you may adapt:".to_string();
    for q in remaining {
        text.push_str("\n- ");
        text.push_str(q);
    }
    text
}

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        "Not specified"
    } else {
        value.trim()
    }
}

fn join_or_unspecified(values: &[String]) -> String {
    let joined = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "Not specified".to_string()
    } else {
        joined
    }
}
