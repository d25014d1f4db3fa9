use std::sync::Arc;

use newsboard_types::BoardEvent;

use crate::error::Result;
use crate::registry::{ConnectionRegistry, DeliveryError, Frame, Subscriber};

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

pub fn encode_event(event: &BoardEvent) -> Result<Frame> {
    Ok(Frame::from(serde_json::to_string(event)?))
}

/// Best-effort fan-out of board events to a thread's subscribers
///
/// A failing subscriber never stops delivery to the others. Subscribers whose
/// buffer is full are evicted; their own connection task unsubscribes them.
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastDispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn broadcast(&self, thread_id: &str, event: &BoardEvent) -> Result<DeliveryReport> {
        let frame = encode_event(event)?;
        let mut report = DeliveryReport::default();

        for subscriber in self.registry.subscribers(thread_id).await {
            match subscriber.deliver(Arc::clone(&frame)) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    report.failed += 1;
                    handle_failure(thread_id, &subscriber, err);
                }
            }
        }

        tracing::debug!(
            thread_id = %thread_id,
            event = event.kind(),
            delivered = report.delivered,
            failed = report.failed,
            "Broadcast event"
        );

        Ok(report)
    }

    /// Deliver one event to a single connection
    pub fn send_to(&self, subscriber: &Subscriber, event: &BoardEvent) -> Result<()> {
        let frame = encode_event(event)?;
        subscriber.deliver(frame)?;
        Ok(())
    }
}

fn handle_failure(thread_id: &str, subscriber: &Subscriber, err: DeliveryError) {
    match err {
        DeliveryError::Closed => {
            tracing::debug!(
                thread_id = %thread_id,
                connection_id = %subscriber.id(),
                "Skipping closed connection"
            );
        }
        DeliveryError::Lagging => {
            tracing::warn!(
                thread_id = %thread_id,
                connection_id = %subscriber.id(),
                "Evicting lagging connection"
            );
            subscriber.evict();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsboard_types::Post;

    #[tokio::test]
    async fn test_failure_does_not_block_others() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = BroadcastDispatcher::new(Arc::clone(&registry));

        let (closed, closed_rx) = Subscriber::channel(4);
        let (healthy, mut healthy_rx) = Subscriber::channel(4);
        drop(closed_rx);

        registry.subscribe("t", closed).await;
        registry.subscribe("t", healthy).await;

        let event = BoardEvent::admitted(0, &Post::new("a", "hi"), false);
        let report = dispatcher.broadcast("t", &event).await.unwrap();

        assert_eq!(report, DeliveryReport { delivered: 1, failed: 1 });
        let frame = healthy_rx.recv().await.unwrap();
        assert!(frame.contains("\"new_post\""));
        // The dispatcher leaves membership to the connection lifecycle
        assert_eq!(registry.subscribers("t").await.len(), 2);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_is_evicted() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = BroadcastDispatcher::new(Arc::clone(&registry));

        let (slow, _slow_rx) = Subscriber::channel(1);
        let watcher = slow.clone();
        registry.subscribe("t", slow).await;

        let event = BoardEvent::error("x");
        dispatcher.broadcast("t", &event).await.unwrap();
        let report = dispatcher.broadcast("t", &event).await.unwrap();

        assert_eq!(report.failed, 1);
        tokio::time::timeout(std::time::Duration::from_secs(1), watcher.evicted())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_broadcast_to_unknown_thread() {
        let dispatcher = BroadcastDispatcher::new(Arc::new(ConnectionRegistry::new()));
        let report = dispatcher
            .broadcast("nobody", &BoardEvent::full("full"))
            .await
            .unwrap();
        assert_eq!(report, DeliveryReport::default());
    }
}
