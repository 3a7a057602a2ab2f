// Q&A over the reference documents.
// All model calls go through llm_client; no direct HTTP here.

pub mod handler;
pub mod prompts;
