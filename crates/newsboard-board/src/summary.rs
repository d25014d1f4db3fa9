use std::sync::Arc;

use newsboard_llm::{GenerateRequest, SummaryPrompt, TextGenerator};
use newsboard_persist::PersistenceClient;
use newsboard_types::{SummaryConfig, Thread};

use crate::editions::EditionService;
use crate::error::{BoardError, Result};
use crate::locks::ThreadLocks;

/// Turns a thread's conversation into a newspaper-style article
///
/// `locks` must be the slots the [`crate::ThreadBoard`] admits posts under.
pub struct SummaryService {
    store: Arc<dyn PersistenceClient>,
    generator: Arc<dyn TextGenerator>,
    editions: Arc<EditionService>,
    config: SummaryConfig,
    anonymous_name: String,
    locks: ThreadLocks,
}

impl SummaryService {
    pub fn new(
        store: Arc<dyn PersistenceClient>,
        generator: Arc<dyn TextGenerator>,
        editions: Arc<EditionService>,
        locks: ThreadLocks,
        config: SummaryConfig,
    ) -> Self {
        Self {
            store,
            generator,
            editions,
            config,
            anonymous_name: "Anonymous".to_string(),
            locks,
        }
    }

    pub fn with_anonymous_name(mut self, name: impl Into<String>) -> Self {
        self.anonymous_name = name.into();
        self
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Summarize the thread at `(newspaper_id, index)` and store the result
    pub async fn generate(&self, newspaper_id: &str, index: u32) -> Result<Thread> {
        let thread = self
            .store
            .get_thread(newspaper_id, index)
            .await?
            .ok_or_else(|| BoardError::thread_not_found(newspaper_id, index))?;

        let transcript: Vec<String> = self
            .store
            .list_posts(&thread.id)
            .await?
            .iter()
            .map(|stored| stored.post.transcript_line())
            .collect();

        let prompt = SummaryPrompt {
            title: &thread.title,
            transcript: &transcript,
            target_chars: self.config.target_chars,
            anonymous_name: &self.anonymous_name,
        }
        .render();

        let response = self
            .generator
            .generate(GenerateRequest::new(prompt))
            .await
            .map_err(|e| BoardError::Upstream(format!("{:#}", e)))?;

        let summary = response.text.trim();
        if summary.is_empty() {
            return Err(BoardError::Upstream("model returned an empty summary".to_string()));
        }

        // Posts may have closed the thread while the model was answering;
        // only the summary field comes from this call
        let updated = {
            let _slot = self.locks.lock(&thread.id).await;
            let current = self
                .store
                .get_thread(newspaper_id, index)
                .await?
                .ok_or_else(|| BoardError::thread_not_found(newspaper_id, index))?;
            let updated = current.with_summary(summary);
            self.store
                .put_thread(newspaper_id, index, updated.clone())
                .await?;
            updated
        };

        tracing::info!(
            thread_id = %updated.id,
            posts = transcript.len(),
            summary_chars = summary.chars().count(),
            "Stored thread summary"
        );

        self.editions.publish_if_complete(newspaper_id).await?;
        Ok(updated)
    }

    /// Threads of an edition with whatever summaries they have so far
    pub async fn summaries(&self, newspaper_id: &str) -> Result<Vec<(u32, Thread)>> {
        self.editions.threads(newspaper_id).await
    }

    /// Free-form generation used for post suggestions
    pub async fn suggest(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(BoardError::Validation("prompt must not be empty".to_string()));
        }

        let response = self
            .generator
            .generate(GenerateRequest::new(prompt))
            .await
            .map_err(|e| BoardError::Upstream(format!("{:#}", e)))?;
        Ok(response.text)
    }
}
