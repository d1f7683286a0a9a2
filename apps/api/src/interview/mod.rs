// Interview Session Orchestrator
// Implements: intent classification, category budgets, the phase state machine,
// prompt composition, model reply interpretation, and session persistence.
// All model calls go through llm_client::TextGenerator.

pub mod budget;
pub mod classifier;
pub mod composer;
pub mod handlers;
pub mod interpreter;
pub mod models;
pub mod orchestrator;
pub mod phase;
pub mod prompts;
pub mod store;

#[cfg(test)]
pub mod testing;
