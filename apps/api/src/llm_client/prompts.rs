// Shared prompt fragments used by every module that talks to the model.
// Domain prompts live in a prompts.rs alongside the module that owns them.

/// Instruction appended to prompts whose reply is parsed as a JSON object.
pub const JSON_OBJECT_INSTRUCTION: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Instruction appended to prompts whose reply is spoken verbatim.
pub const PLAIN_SPEECH_INSTRUCTION: &str = "Respond with plain spoken text only. \
    No JSON, no markdown, no stage directions.";
