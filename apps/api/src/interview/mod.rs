// Interview assistant: question generation and answer evaluation.
// All LLM calls go through llm_client; this module owns prompts, schemas and validation.

pub mod evaluation;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod schema;
