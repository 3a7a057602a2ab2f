// Shared fixtures for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::Config;
use crate::llm_client::{CompletionClient, LlmError};
use crate::state::AppState;
use crate::storage::testing::MemoryStore;

pub const RESUME_KEY: &str = "resume.txt";
pub const LIFE_NOTES_KEY: &str = "notes.json";

/// Replies with the question it was asked.
pub struct EchoCompletions;

#[async_trait]
impl CompletionClient for EchoCompletions {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, LlmError> {
        Ok(format!("You asked: {user}"))
    }
}

/// Store holding both reference documents under the test keys.
pub fn stocked_store() -> MemoryStore {
    MemoryStore::default()
        .with(RESUME_KEY, "Ryan Pierce - Software Engineer at Acme")
        .with(LIFE_NOTES_KEY, "{\"hobbies\": [\"hiking\"]}")
}

pub fn test_state(store: Arc<MemoryStore>, completions: Arc<dyn CompletionClient>) -> AppState {
    let mut config = Config::from_lookup(|_| None).unwrap();
    config.resume_key = RESUME_KEY.to_string();
    config.life_notes_key = LIFE_NOTES_KEY.to_string();

    AppState {
        documents: store,
        completions,
        config,
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
