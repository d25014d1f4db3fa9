use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Notify, RwLock};

/// Serialized event text, shared between every subscriber it is sent to
pub type Frame = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ConnectionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("connection closed")]
    Closed,

    #[error("connection is lagging behind")]
    Lagging,
}

/// Sending side of one live connection
///
/// The owning connection task keeps the receiver returned by
/// [`Subscriber::channel`] and forwards frames to its socket.
#[derive(Debug, Clone)]
pub struct Subscriber {
    id: ConnectionId,
    sender: mpsc::Sender<Frame>,
    evicted: Arc<Notify>,
}

impl Subscriber {
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let subscriber = Self {
            id: ConnectionId::next(),
            sender,
            evicted: Arc::new(Notify::new()),
        };
        (subscriber, receiver)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a frame without waiting
    pub fn deliver(&self, frame: Frame) -> std::result::Result<(), DeliveryError> {
        self.sender.try_send(frame).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Lagging,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Ask the owning connection task to shut down
    pub fn evict(&self) {
        self.evicted.notify_one();
    }

    /// Resolves once [`Subscriber::evict`] has been called
    pub async fn evicted(&self) {
        self.evicted.notified().await;
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Live connections grouped by thread id
///
/// An entry exists only while at least one connection is subscribed.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    threads: RwLock<HashMap<String, HashMap<ConnectionId, Subscriber>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the connection was already subscribed
    pub async fn subscribe(&self, thread_id: &str, subscriber: Subscriber) -> bool {
        let mut threads = self.threads.write().await;
        let entry = threads.entry(thread_id.to_string()).or_default();
        if entry.contains_key(&subscriber.id) {
            return false;
        }
        entry.insert(subscriber.id, subscriber);
        true
    }

    /// Returns `false` when nothing was removed
    pub async fn unsubscribe(&self, thread_id: &str, connection_id: ConnectionId) -> bool {
        let mut threads = self.threads.write().await;
        let Some(entry) = threads.get_mut(thread_id) else {
            return false;
        };

        let removed = entry.remove(&connection_id).is_some();
        if entry.is_empty() {
            threads.remove(thread_id);
        }
        removed
    }

    /// Snapshot of the thread's subscribers, in connection order
    pub async fn subscribers(&self, thread_id: &str) -> Vec<Subscriber> {
        let threads = self.threads.read().await;
        let mut subscribers: Vec<Subscriber> = threads
            .get(thread_id)
            .map(|entry| entry.values().cloned().collect())
            .unwrap_or_default();
        subscribers.sort_by_key(|s| s.id);
        subscribers
    }

    pub async fn contains_thread(&self, thread_id: &str) -> bool {
        self.threads.read().await.contains_key(thread_id)
    }

    pub async fn thread_count(&self) -> usize {
        self.threads.read().await.len()
    }

    pub async fn connection_count(&self) -> usize {
        self.threads.read().await.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (subscriber, _rx) = Subscriber::channel(4);

        assert!(registry.subscribe("t", subscriber.clone()).await);
        assert!(!registry.subscribe("t", subscriber).await);
        assert_eq!(registry.subscribers("t").await.len(), 1);
        assert_eq!(registry.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_last_unsubscribe_removes_entry() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = Subscriber::channel(4);
        let (b, _rx_b) = Subscriber::channel(4);

        registry.subscribe("t", a.clone()).await;
        registry.subscribe("t", b.clone()).await;

        assert!(registry.unsubscribe("t", a.id()).await);
        assert!(registry.contains_thread("t").await);

        assert!(registry.unsubscribe("t", b.id()).await);
        assert!(!registry.contains_thread("t").await);
        assert!(registry.subscribers("t").await.is_empty());
        assert_eq!(registry.thread_count().await, 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_unknown_is_noop() {
        let registry = ConnectionRegistry::new();
        let (a, _rx) = Subscriber::channel(4);

        assert!(!registry.unsubscribe("missing", a.id()).await);

        registry.subscribe("t", a.clone()).await;
        assert!(!registry.unsubscribe("t", ConnectionId::next()).await);
        assert_eq!(registry.subscribers("t").await.len(), 1);
    }

    #[tokio::test]
    async fn test_deliver_reports_lagging_and_closed() {
        let (subscriber, rx) = Subscriber::channel(1);

        subscriber.deliver(Frame::from("one")).unwrap();
        assert_eq!(subscriber.deliver(Frame::from("two")), Err(DeliveryError::Lagging));

        drop(rx);
        assert!(subscriber.is_closed());
        assert_eq!(subscriber.deliver(Frame::from("three")), Err(DeliveryError::Closed));
    }

    #[tokio::test]
    async fn test_evict_wakes_owner() {
        let (subscriber, _rx) = Subscriber::channel(1);
        let watcher = subscriber.clone();

        subscriber.evict();
        tokio::time::timeout(std::time::Duration::from_secs(1), watcher.evicted())
            .await
            .unwrap();
    }
}
