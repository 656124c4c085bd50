// Resume ingestion: text extraction → upload → LLM field extraction → CRM sync.
// All outbound calls go through the trait objects held in AppState.

pub mod fields;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
