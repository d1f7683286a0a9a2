//! Response Interpreter: turns raw model text into a `{feedback, nextQuestion}` reply.
//!
//! Two stages: strict JSON extraction from the first balanced `{...}` block,
//! then a sentence-splitting fallback. Never fails.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::models::InterviewPhase;
use crate::interview::prompts::{fill_template, FALLBACK_FEEDBACK, FALLBACK_QUESTION};
use crate::llm_client::strip_json_fences;

/// The structured reply spoken back to the candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelReply {
    pub feedback: String,
    pub next_question: String,
}

impl ModelReply {
    /// Both parts joined as one spoken message.
    pub fn spoken(&self) -> String {
        [self.feedback.trim(), self.next_question.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a reply was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Parsed(ModelReply),
    Fallback(ModelReply),
}

impl Interpretation {
    pub fn reply(&self) -> &ModelReply {
        match self {
            Self::Parsed(reply) | Self::Fallback(reply) => reply,
        }
    }

    pub fn into_reply(self) -> ModelReply {
        match self {
            Self::Parsed(reply) | Self::Fallback(reply) => reply,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default, alias = "next_question")]
    #[serde(rename = "nextQuestion")]
    next_question: Option<String>,
}

/// Interprets raw model text for a turn landing in `phase`.
///
/// `question_first` marks clarification and candidate-question acknowledgement
/// turns: a single-sentence fallback is then routed to `next_question`.
/// `job_title` fills the generic follow-up used when nothing usable remains.
pub fn interpret(
    phase: InterviewPhase,
    raw: &str,
    question_first: bool,
    job_title: &str,
) -> Interpretation {
    let raw = raw.trim();

    if phase == InterviewPhase::Closing {
        let reply = ModelReply {
            feedback: raw.to_string(),
            next_question: String::new(),
        };
        return if reply.feedback.is_empty() {
            Interpretation::Fallback(ModelReply {
                feedback: FALLBACK_FEEDBACK.to_string(),
                next_question: String::new(),
            })
        } else {
            Interpretation::Parsed(reply)
        };
    }

    if let Some(reply) = parse_json_reply(raw) {
        return Interpretation::Parsed(reply);
    }

    if !raw.is_empty() {
        warn!(
            "Model reply was not valid JSON, using sentence fallback: {:?}",
            raw.chars().take(80).collect::<String>()
        );
    }

    let mut reply = split_sentences_reply(raw, question_first);
    if reply.feedback.is_empty() && reply.next_question.is_empty() {
        reply = default_reply(job_title);
    }
    Interpretation::Fallback(reply)
}

/// The fixed safe reply.
pub fn default_reply(job_title: &str) -> ModelReply {
    let title = if job_title.trim().is_empty() {
        "this"
    } else {
        job_title.trim()
    };
    ModelReply {
        feedback: FALLBACK_FEEDBACK.to_string(),
        next_question: fill_template(FALLBACK_QUESTION, &[("job_title", title)]),
    }
}

/// Strict stage: the first balanced object must deserialize and carry some text.
fn parse_json_reply(raw: &str) -> Option<ModelReply> {
    let object = first_balanced_object(strip_json_fences(raw))?;
    let parsed: RawReply = serde_json::from_str(object).ok()?;
    let reply = ModelReply {
        feedback: parsed.feedback.unwrap_or_default().trim().to_string(),
        next_question: parsed.next_question.unwrap_or_default().trim().to_string(),
    };
    if reply.feedback.is_empty() && reply.next_question.is_empty() {
        None
    } else {
        Some(reply)
    }
}

/// Returns the first `{...}` block whose braces balance, ignoring braces inside strings.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Fallback stage. Sentences end at a period followed by whitespace; the first
/// half becomes feedback and the rest the next question.
fn split_sentences_reply(raw: &str, question_first: bool) -> ModelReply {
    let sentences = split_sentences(raw);

    if sentences.len() < 2 {
        let whole = sentences.join(" ");
        return if question_first {
            ModelReply {
                feedback: String::new(),
                next_question: whole,
            }
        } else {
            ModelReply {
                feedback: whole,
                next_question: String::new(),
            }
        };
    }

    let mid = sentences.len() / 2;
    ModelReply {
        feedback: sentences[..mid].join(" "),
        next_question: sentences[mid..].join(" "),
    }
}

fn split_sentences(raw: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let at_boundary = c == '.' && chars.peek().map_or(true, |n| n.is_whitespace());
        if at_boundary {
            let sentence = current.trim();
            if !sentence.is_empty() && sentence != "." {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}
