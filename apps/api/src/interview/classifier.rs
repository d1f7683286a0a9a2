//! Intent Classifier: deterministic phrase heuristics over a candidate utterance.
//!
//! Phrase lists are configuration data injected at construction, so they can
//! be swapped for another locale or extended without touching the matcher.

use serde::{Deserialize, Serialize};

const CLARIFICATION_PHRASES: &[&str] = &[
    "repeat",
    "say again",
    "say that again",
    "didn't understand",
    "did not understand",
    "don't understand",
    "could you rephrase",
    "can you rephrase",
    "rephrase that",
    "what do you mean",
    "didn't catch",
    "didn't hear",
    "come again",
    "pardon",
];

const FINAL_QUESTIONS_PHRASES: &[&str] = &[
    "any questions",
    "questions for you",
    "i have questions",
    "i have a question",
    "can i ask",
    "may i ask",
    "i'd like to ask",
    "i would like to ask",
];

/// Matched on word boundaries, unlike the two lists above.
const NO_MORE_QUESTIONS_PHRASES: &[&str] = &["no", "don't have", "no questions"];

/// The phrase configuration used by the classifier. Lists missing from an
/// override file keep their built-in English defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentPhrases {
    pub clarification: Vec<String>,
    pub final_questions: Vec<String>,
    pub no_more_questions: Vec<String>,
}

impl Default for IntentPhrases {
    fn default() -> Self {
        fn owned(list: &[&str]) -> Vec<String> {
            list.iter().map(|p| p.to_string()).collect()
        }
        Self {
            clarification: owned(CLARIFICATION_PHRASES),
            final_questions: owned(FINAL_QUESTIONS_PHRASES),
            no_more_questions: owned(NO_MORE_QUESTIONS_PHRASES),
        }
    }
}

/// Classifier output. The two flags are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub is_clarification: bool,
    pub is_final_questions_request: bool,
}

impl Intent {
    /// True when the turn is an actual answer to an interview question.
    pub fn is_genuine_answer(&self) -> bool {
        !self.is_clarification && !self.is_final_questions_request
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntentClassifier {
    phrases: IntentPhrases,
}

impl IntentClassifier {
    pub fn new(phrases: IntentPhrases) -> Self {
        Self { phrases }
    }

    /// Case-insensitive substring classification. Never fails; empty input yields both false.
    pub fn classify(&self, utterance: &str) -> Intent {
        let lowered = normalize_apostrophes(&utterance.to_lowercase());
        Intent {
            is_clarification: contains_any(&lowered, &self.phrases.clarification),
            is_final_questions_request: contains_any(&lowered, &self.phrases.final_questions),
        }
    }

    /// Whether a reply during the candidate-questions phase declines further questions.
    pub fn declines_further_questions(&self, utterance: &str) -> bool {
        let padded = format!(" {} ", word_tokens(utterance).join(" "));
        self.phrases.no_more_questions.iter().any(|phrase| {
            let phrase = word_tokens(phrase).join(" ");
            !phrase.is_empty() && padded.contains(&format!(" {phrase} "))
        })
    }
}

fn contains_any(haystack: &str, phrases: &[String]) -> bool {
    phrases
        .iter()
        .map(|p| normalize_apostrophes(&p.to_lowercase()))
        .any(|p| !p.is_empty() && haystack.contains(&p))
}

/// ASR output often carries typographic apostrophes.
fn normalize_apostrophes(text: &str) -> String {
    text.replace(['\u{2019}', '\u{2018}'], "'")
}

/// Lowercased words, punctuation stripped except in-word apostrophes.
fn word_tokens(text: &str) -> Vec<String> {
    normalize_apostrophes(&text.to_lowercase())
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::default()
    }

    #[test]
    fn test_repeat_request_is_clarification() {
        let intent = classifier().classify("can you repeat that?");
        assert!(intent.is_clarification);
        assert!(!intent.is_final_questions_request);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(classifier().classify("Sorry, I DIDN'T UNDERSTAND").is_clarification);
    }

    #[test]
    fn test_typographic_apostrophe_is_normalized() {
        assert!(classifier().classify("I didn\u{2019}t catch that").is_clarification);
    }

    #[test]
    fn test_final_questions_request_detected() {
        let intent = classifier().classify("Actually I have a question about the team");
        assert!(intent.is_final_questions_request);
        assert!(!intent.is_clarification);
    }

    #[test]
    fn test_both_flags_can_match() {
        let intent = classifier().classify("Could you rephrase? Also, I have questions for you.");
        assert!(intent.is_clarification);
        assert!(intent.is_final_questions_request);
    }

    #[test]
    fn test_plain_answer_matches_neither() {
        let intent = classifier().classify("I built a distributed cache in Rust at my last job.");
        assert_eq!(intent, Intent::default());
        assert!(intent.is_genuine_answer());
    }

    #[test]
    fn test_empty_and_garbage_input_match_neither() {
        assert_eq!(classifier().classify(""), Intent::default());
        assert_eq!(classifier().classify("#$%^&*()"), Intent::default());
    }

    #[test]
    fn test_injected_phrases_replace_defaults() {
        let phrases = IntentPhrases {
            clarification: vec!["otra vez".to_string()],
            final_questions: vec!["tengo preguntas".to_string()],
            no_more_questions: vec!["no".to_string()],
        };
        let classifier = IntentClassifier::new(phrases);
        assert!(classifier.classify("¿Otra vez, por favor?").is_clarification);
        assert!(!classifier.classify("can you repeat that").is_clarification);
        assert!(classifier.classify("Tengo preguntas").is_final_questions_request);
    }

    #[test]
    fn test_declines_further_questions() {
        let c = classifier();
        assert!(c.declines_further_questions("no, I don't have any questions"));
        assert!(c.declines_further_questions("No questions, thanks!"));
        assert!(c.declines_further_questions("I don\u{2019}t have anything else"));
    }

    #[test]
    fn test_no_is_matched_as_a_word() {
        let c = classifier();
        assert!(!c.declines_further_questions("I'd like to know more about the team"));
        assert!(!c.declines_further_questions("What does a normal week look like?"));
    }

    #[test]
    fn test_partial_override_keeps_default_lists() {
        let phrases: IntentPhrases =
            serde_json::from_str(r#"{"clarification": ["otra vez"]}"#).unwrap();
        assert_eq!(phrases.clarification, vec!["otra vez".to_string()]);
        assert_eq!(phrases.final_questions, IntentPhrases::default().final_questions);
        assert_eq!(phrases.no_more_questions, IntentPhrases::default().no_more_questions);
    }
}
