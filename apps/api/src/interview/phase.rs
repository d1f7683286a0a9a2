//! Phase State Machine: pure transition function over interview phases.
//!
//! | current          | guard                                      | next            |
//! |------------------|--------------------------------------------|-----------------|
//! | introduction     | any turn                                   | candidate_intro |
//! | candidate_intro  | not a clarification                        | questions       |
//! | questions        | asked >= total, or every category finished | final_questions |
//! | final_questions  | candidate declines further questions       | closing         |
//! | closing          | any turn                                   | completed       |
//! | completed        | never                                      | completed       |
//!
//! Any other case leaves the phase unchanged.

use crate::interview::classifier::Intent;
use crate::interview::models::{InterviewPhase, InterviewState};

/// Result of evaluating one turn against the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: InterviewPhase,
    pub to: InterviewPhase,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Computes the next phase.
///
/// `state` must already carry this turn's budget update. `declines_further_questions`
/// is the classifier's verdict on the raw utterance.
pub fn next_phase(state: &InterviewState, intent: &Intent, declines_further_questions: bool) -> Transition {
    let from = state.current_phase;
    let to = match from {
        InterviewPhase::Introduction => InterviewPhase::CandidateIntro,
        InterviewPhase::CandidateIntro if intent.is_clarification => InterviewPhase::CandidateIntro,
        InterviewPhase::CandidateIntro => InterviewPhase::Questions,
        InterviewPhase::Questions
            if state.actual_questions_asked >= state.total_questions
                || state.all_categories_complete() =>
        {
            InterviewPhase::FinalQuestions
        }
        InterviewPhase::Questions => InterviewPhase::Questions,
        InterviewPhase::FinalQuestions if declines_further_questions => InterviewPhase::Closing,
        InterviewPhase::FinalQuestions => InterviewPhase::FinalQuestions,
        InterviewPhase::Closing => InterviewPhase::Completed,
        InterviewPhase::Completed => InterviewPhase::Completed,
    };
    Transition { from, to }
}

/// Writes a transition into the working state, including its side flags.
pub fn apply(state: &mut InterviewState, transition: Transition) {
    state.current_phase = transition.to;
    match transition.to {
        InterviewPhase::FinalQuestions if transition.changed() => {
            state.is_waiting_for_final_questions = true;
        }
        InterviewPhase::Closing | InterviewPhase::Completed => {
            state.is_waiting_for_final_questions = false;
        }
        _ => {}
    }
}

/// Explicit termination requested by the caller. Passes through `closing`.
pub fn close_out(state: &mut InterviewState) {
    let from = state.current_phase;
    if from.ordinal() < InterviewPhase::Closing.ordinal() {
        apply(
            state,
            Transition {
                from,
                to: InterviewPhase::Closing,
            },
        );
    }
    let from = state.current_phase;
    apply(
        state,
        Transition {
            from,
            to: InterviewPhase::Completed,
        },
    );
}
