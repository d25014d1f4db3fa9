use std::sync::Arc;

use chrono::Utc;
use newsboard_persist::PersistenceClient;
use newsboard_types::{BoardConfig, BoardEvent, PostView, StoredPost, Thread};
use tokio::sync::mpsc;

use crate::admission::{AdmissionGate, AdmissionReceipt, PostSubmission};
use crate::dispatcher::BroadcastDispatcher;
use crate::error::{BoardError, Result};
use crate::locks::ThreadLocks;
use crate::queue::SummaryQueue;
use crate::registry::{ConnectionId, ConnectionRegistry, Frame, Subscriber};
use crate::seed;

/// Where a connection or submission points: a thread inside an edition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadTarget {
    pub newspaper_id: String,
    pub thread_index: u32,
    pub thread_id: String,
}

impl ThreadTarget {
    pub fn new(
        newspaper_id: impl Into<String>,
        thread_index: u32,
        thread_id: impl Into<String>,
    ) -> Self {
        Self {
            newspaper_id: newspaper_id.into(),
            thread_index,
            thread_id: thread_id.into(),
        }
    }

    pub fn submission(&self) -> PostSubmission {
        PostSubmission::new(&self.thread_id, &self.newspaper_id, self.thread_index)
    }
}

/// Live thread board: subscriptions, post admission and fan-out
///
/// Every path that accepts posts (WebSocket and HTTP alike) goes through
/// [`ThreadBoard::submit`], so subscribers see the same ordered stream.
pub struct ThreadBoard {
    store: Arc<dyn PersistenceClient>,
    registry: Arc<ConnectionRegistry>,
    dispatcher: BroadcastDispatcher,
    gate: AdmissionGate,
    config: BoardConfig,
    summary_queue: Option<SummaryQueue>,
}

impl ThreadBoard {
    pub fn new(store: Arc<dyn PersistenceClient>, config: BoardConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            dispatcher: BroadcastDispatcher::new(Arc::clone(&registry)),
            gate: AdmissionGate::new(Arc::clone(&store), config.clone()),
            registry,
            store,
            config,
            summary_queue: None,
        }
    }

    /// Admit under slots shared with other thread writers
    pub fn with_thread_locks(mut self, locks: ThreadLocks) -> Self {
        self.gate = self.gate.with_locks(locks);
        self
    }

    /// Summarize threads automatically once they close
    pub fn with_summary_queue(mut self, queue: SummaryQueue) -> Self {
        self.summary_queue = Some(queue);
        self
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Slots guarding every thread write
    pub fn thread_locks(&self) -> &ThreadLocks {
        self.gate.locks()
    }

    /// New subscriber handle sized by `subscriber_buffer`
    pub fn subscriber(&self) -> (Subscriber, mpsc::Receiver<Frame>) {
        Subscriber::channel(self.config.subscriber_buffer)
    }

    /// Thread metadata at the target, checked against the expected id
    pub async fn resolve(&self, target: &ThreadTarget) -> Result<Thread> {
        let thread = self
            .load_thread(&target.newspaper_id, target.thread_index)
            .await?;

        if thread.id != target.thread_id {
            return Err(BoardError::Validation(format!(
                "thread-id {} does not match thread {} of newspaper {}",
                target.thread_id, target.thread_index, target.newspaper_id
            )));
        }
        Ok(thread)
    }

    /// Subscribe a connection and queue its `start` snapshot
    ///
    /// The snapshot is queued while the thread's admission slot is held, so
    /// it always precedes any post event the connection receives.
    pub async fn attach(&self, target: &ThreadTarget, subscriber: Subscriber) -> Result<Thread> {
        let thread = self.resolve(target).await?;
        let _slot = self.gate.lock_thread(&thread.id).await;

        let posts = self.posts(&thread.id).await?;
        let start = BoardEvent::Start {
            thread: Some(thread.clone()),
            posts: posts.iter().map(|stored| PostView::from(&stored.post)).collect(),
        };
        self.dispatcher.send_to(&subscriber, &start)?;

        let connection_id = subscriber.id();
        self.registry.subscribe(&thread.id, subscriber).await;

        tracing::info!(
            thread_id = %thread.id,
            connection_id = %connection_id,
            posts = posts.len(),
            "Connection attached"
        );
        Ok(thread)
    }

    pub async fn detach(&self, thread_id: &str, connection_id: ConnectionId) -> bool {
        let removed = self.registry.unsubscribe(thread_id, connection_id).await;
        if removed {
            tracing::info!(thread_id = %thread_id, connection_id = %connection_id, "Connection detached");
        }
        removed
    }

    /// Admit a post and announce it to the thread's subscribers
    pub async fn submit(&self, submission: PostSubmission) -> Result<AdmissionReceipt> {
        let target = ThreadTarget::new(
            &submission.newspaper_id,
            submission.thread_index,
            &submission.thread_id,
        );
        self.resolve(&target).await?;

        let admitted = self.gate.admit(submission).await?;
        let receipt = admitted.receipt;

        let event = BoardEvent::admitted(receipt.sequence_index, &receipt.post, receipt.limit_reached);
        self.dispatcher.broadcast(&target.thread_id, &event).await?;
        drop(admitted.slot);

        if receipt.limit_reached {
            self.request_summary(&target);
        }
        Ok(receipt)
    }

    fn request_summary(&self, target: &ThreadTarget) {
        let Some(queue) = &self.summary_queue else {
            return;
        };
        if let Err(err) = queue.enqueue(&target.newspaper_id, target.thread_index) {
            tracing::warn!(thread_id = %target.thread_id, error = %err, "Could not queue summary");
        }
    }

    /// Posts of a thread, ordered by sequence index
    pub async fn posts(&self, thread_id: &str) -> Result<Vec<StoredPost>> {
        Ok(self.store.list_posts(thread_id).await?)
    }

    /// Replace a thread's posts with the sample conversation (development seeding)
    ///
    /// Earlier posts are removed, at most `post_limit` samples are written and
    /// the thread is closed when they fill it. A closed thread stays closed.
    pub async fn seed_thread_posts(&self, newspaper_id: &str, index: u32) -> Result<usize> {
        let thread_id = self.load_thread(newspaper_id, index).await?.id;
        let _slot = self.gate.lock_thread(&thread_id).await;
        let thread = self.load_thread(newspaper_id, index).await?;

        let limit = usize::try_from(self.config.post_limit).unwrap_or(usize::MAX);
        let mut posts = seed::sample_posts(&self.config.anonymous_name, Utc::now());
        posts.truncate(limit);
        let count = posts.len();

        let removed = self.store.delete_posts(&thread.id).await?;
        for (position, post) in (0u64..).zip(posts) {
            self.store.put_post(&thread.id, position, post).await?;
        }

        let mut seeded = Thread {
            title: seed::SAMPLE_TITLE.to_string(),
            ..thread
        };
        if count >= limit {
            seeded = seeded.closed();
        }
        self.store.put_thread(newspaper_id, index, seeded.clone()).await?;

        tracing::info!(
            thread_id = %seeded.id,
            count,
            removed,
            enabled = seeded.enabled,
            "Seeded thread posts"
        );
        Ok(count)
    }

    async fn load_thread(&self, newspaper_id: &str, index: u32) -> Result<Thread> {
        self.store
            .get_thread(newspaper_id, index)
            .await?
            .ok_or_else(|| BoardError::thread_not_found(newspaper_id, index))
    }

    /// Deliver an event to one connection only (rejections, errors)
    pub fn reply(&self, subscriber: &Subscriber, event: &BoardEvent) -> Result<()> {
        self.dispatcher.send_to(subscriber, event)
    }
}
