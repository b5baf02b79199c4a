// Interview question generation and answer feedback.
// All LLM calls go through llm_client; nothing here talks to a provider directly.

pub mod feedback;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod sampling;
