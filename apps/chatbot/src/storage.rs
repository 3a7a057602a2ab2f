//! Reference document storage: the résumé and life notes the bot answers from.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use thiserror::Error;
use tracing::{error, info};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("S3 error: {0}")]
    S3(String),

    #[error("Object body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Fetches text documents by key. Carried in `AppState` as `Arc<dyn DocumentStore>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<String, DocumentError>;
}

/// `DocumentStore` backed by a single S3 bucket.
pub struct S3DocumentStore {
    client: S3Client,
    bucket: String,
}

impl S3DocumentStore {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn fetch(&self, key: &str) -> Result<String, DocumentError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                DocumentError::S3(aws_sdk_s3::error::DisplayErrorContext(e).to_string())
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| DocumentError::S3(format!("reading body of {key}: {e}")))?
            .into_bytes();

        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// The two documents composed into every prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDocuments {
    pub resume: String,
    pub life_notes: String,
}

/// Loads both documents, sequentially and uncached.
///
/// Returns `None` if either is unavailable. Empty content counts as
/// unavailable. Both fetches are always attempted so each failure is logged.
pub async fn load_reference_documents(
    store: &dyn DocumentStore,
    config: &Config,
) -> Option<ReferenceDocuments> {
    let life_notes = fetch_document(store, &config.life_notes_key).await;
    let resume = fetch_document(store, &config.resume_key).await;

    Some(ReferenceDocuments {
        resume: resume?,
        life_notes: life_notes?,
    })
}

async fn fetch_document(store: &dyn DocumentStore, key: &str) -> Option<String> {
    match store.fetch(key).await {
        Ok(text) if text.is_empty() => {
            error!("Fetching {key} returned an empty document");
            None
        }
        Ok(text) => {
            info!("Loaded {key} ({} bytes)", text.len());
            Some(text)
        }
        Err(e) => {
            error!("Fetching {key} failed: {e}");
            None
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory store; keys not present fail like a missing S3 object.
    #[derive(Default)]
    pub struct MemoryStore {
        docs: HashMap<String, String>,
        pub fetched: Mutex<Vec<String>>,
    }

    impl MemoryStore {
        pub fn with(mut self, key: &str, text: &str) -> Self {
            self.docs.insert(key.to_string(), text.to_string());
            self
        }

        pub fn fetch_count(&self) -> usize {
            self.fetched.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn fetch(&self, key: &str) -> Result<String, DocumentError> {
            self.fetched.lock().unwrap().push(key.to_string());
            self.docs
                .get(key)
                .cloned()
                .ok_or_else(|| DocumentError::S3(format!("NoSuchKey: {key}")))
        }
    }
}
