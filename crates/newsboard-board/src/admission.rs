use std::sync::Arc;

use newsboard_persist::PersistenceClient;
use newsboard_types::{BoardConfig, Post};
use tokio::sync::OwnedMutexGuard;

use crate::error::{BoardError, Result};
use crate::locks::ThreadLocks;

/// A post offered to a thread
#[derive(Debug, Clone)]
pub struct PostSubmission {
    pub thread_id: String,
    pub newspaper_id: String,
    /// Position of the thread inside its newspaper
    pub thread_index: u32,
    pub author: Option<String>,
    pub body: Option<String>,
}

impl PostSubmission {
    pub fn new(
        thread_id: impl Into<String>,
        newspaper_id: impl Into<String>,
        thread_index: u32,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            newspaper_id: newspaper_id.into(),
            thread_index,
            author: None,
            body: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionReceipt {
    pub accepted: bool,
    pub sequence_index: u64,
    pub limit_reached: bool,
    pub post: Post,
}

/// An admitted post together with the thread's admission slot
///
/// No other admission for the same thread proceeds until `slot` is dropped.
pub struct Admitted {
    pub receipt: AdmissionReceipt,
    pub slot: OwnedMutexGuard<()>,
}

/// Decides whether a post may join its thread and closes threads at the limit
///
/// Admissions to one thread run one at a time; different threads never wait
/// on each other.
pub struct AdmissionGate {
    store: Arc<dyn PersistenceClient>,
    config: BoardConfig,
    locks: ThreadLocks,
}

impl AdmissionGate {
    pub fn new(store: Arc<dyn PersistenceClient>, config: BoardConfig) -> Self {
        Self {
            store,
            config,
            locks: ThreadLocks::new(),
        }
    }

    /// Share slots with other writers of the same threads
    pub fn with_locks(mut self, locks: ThreadLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn locks(&self) -> &ThreadLocks {
        &self.locks
    }

    pub fn post_limit(&self) -> u64 {
        self.config.post_limit
    }

    /// Wait for exclusive admission rights on a thread
    pub async fn lock_thread(&self, thread_id: &str) -> OwnedMutexGuard<()> {
        self.locks.lock(thread_id).await
    }

    pub async fn admit(&self, submission: PostSubmission) -> Result<Admitted> {
        let post = self.prepare(&submission)?;
        let slot = self.lock_thread(&submission.thread_id).await;

        let limit = self.config.post_limit;
        let count = self.store.count_posts(&submission.thread_id).await?;

        if count >= limit {
            if let Err(err) = self
                .close_thread(&submission.newspaper_id, submission.thread_index)
                .await
            {
                tracing::warn!(
                    thread_id = %submission.thread_id,
                    error = %err,
                    "Could not mark full thread as closed"
                );
            }
            return Err(BoardError::ThreadFull {
                thread_id: submission.thread_id,
                limit,
            });
        }

        let sequence_index = self
            .store
            .append_post(&submission.thread_id, post.clone())
            .await?;
        let limit_reached = sequence_index + 1 >= limit;

        tracing::info!(
            thread_id = %submission.thread_id,
            sequence_index,
            limit_reached,
            "Post admitted"
        );

        if limit_reached {
            // The appended post stays even if this fails
            self.close_thread(&submission.newspaper_id, submission.thread_index)
                .await?;
        }

        Ok(Admitted {
            receipt: AdmissionReceipt {
                accepted: true,
                sequence_index,
                limit_reached,
                post,
            },
            slot,
        })
    }

    fn prepare(&self, submission: &PostSubmission) -> Result<Post> {
        let body = submission
            .body
            .as_deref()
            .filter(|body| !body.trim().is_empty())
            .ok_or_else(|| BoardError::Validation("post body must not be empty".to_string()))?;

        let author = submission
            .author
            .as_deref()
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .unwrap_or(self.config.anonymous_name.as_str());

        Ok(Post::new(author, body))
    }

    /// Set `enabled = false` on the thread metadata; no-op when already closed
    async fn close_thread(&self, newspaper_id: &str, thread_index: u32) -> Result<()> {
        let thread = self
            .store
            .get_thread(newspaper_id, thread_index)
            .await?
            .ok_or_else(|| BoardError::thread_not_found(newspaper_id, thread_index))?;

        if thread.is_open() {
            self.store
                .put_thread(newspaper_id, thread_index, thread.closed())
                .await?;
            tracing::info!(thread_id = %thread.id, "Thread closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsboard_persist::MemoryPersistenceClient;
    use newsboard_types::Thread;

    async fn setup(limit: u64) -> (Arc<dyn PersistenceClient>, AdmissionGate, Thread) {
        let store: Arc<dyn PersistenceClient> = Arc::new(MemoryPersistenceClient::new());
        let thread = Thread::open("Cats");
        store.put_thread("paper", 0, thread.clone()).await.unwrap();
        let gate = AdmissionGate::new(
            Arc::clone(&store),
            BoardConfig::new().with_post_limit(limit),
        );
        (store, gate, thread)
    }

    fn submission(thread: &Thread, body: &str) -> PostSubmission {
        PostSubmission::new(&thread.id, "paper", 0).with_body(body)
    }

    #[tokio::test]
    async fn test_blank_body_is_rejected_without_append() {
        let (store, gate, thread) = setup(5).await;

        for body in [None, Some(""), Some("   \n")] {
            let mut sub = PostSubmission::new(&thread.id, "paper", 0);
            sub.body = body.map(str::to_string);
            let err = gate.admit(sub).await.err().unwrap();
            assert!(matches!(err, BoardError::Validation(_)));
        }
        assert_eq!(store.count_posts(&thread.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_author_becomes_anonymous() {
        let (_store, gate, thread) = setup(5).await;

        let admitted = gate.admit(submission(&thread, "hi")).await.unwrap();
        assert_eq!(admitted.receipt.post.author, "Anonymous");
        drop(admitted);

        let admitted = gate
            .admit(submission(&thread, "hi").with_author("  kumo "))
            .await
            .unwrap();
        assert_eq!(admitted.receipt.post.author, "kumo");
    }

    #[tokio::test]
    async fn test_limit_closes_thread_then_rejects() {
        let (store, gate, thread) = setup(2).await;

        let first = gate.admit(submission(&thread, "1")).await.unwrap().receipt;
        assert_eq!((first.sequence_index, first.limit_reached), (0, false));

        let second = gate.admit(submission(&thread, "2")).await.unwrap().receipt;
        assert_eq!((second.sequence_index, second.limit_reached), (1, true));
        assert!(!store.get_thread("paper", 0).await.unwrap().unwrap().enabled);

        let err = gate.admit(submission(&thread, "3")).await.err().unwrap();
        assert!(matches!(err, BoardError::ThreadFull { limit: 2, .. }));
        assert_eq!(store.count_posts(&thread.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_metadata_at_limit_keeps_post() {
        let store: Arc<dyn PersistenceClient> = Arc::new(MemoryPersistenceClient::new());
        let gate = AdmissionGate::new(Arc::clone(&store), BoardConfig::new().with_post_limit(1));

        let err = gate
            .admit(PostSubmission::new("ghost", "paper", 3).with_body("hello"))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, BoardError::ThreadNotFound { index: 3, .. }));
        assert_eq!(store.count_posts("ghost").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_slot_serializes_same_thread() {
        let (_store, gate, thread) = setup(10).await;
        let gate = Arc::new(gate);

        let held = gate.admit(submission(&thread, "first")).await.unwrap();

        let waiting = {
            let gate = Arc::clone(&gate);
            let sub = submission(&thread, "second");
            tokio::spawn(async move { gate.admit(sub).await.map(|a| a.receipt.sequence_index) })
        };

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!waiting.is_finished());

        drop(held);
        assert_eq!(waiting.await.unwrap().unwrap(), 1);
    }
}
