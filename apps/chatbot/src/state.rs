use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionClient;
use crate::storage::DocumentStore;

/// Shared, read-only state for every invocation.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    /// Holds the API key fetched at startup; never refreshed.
    pub completions: Arc<dyn CompletionClient>,
    pub config: Config,
}
