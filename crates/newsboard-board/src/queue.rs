use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{BoardError, Result};
use crate::summary::SummaryService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTask {
    pub newspaper_id: String,
    pub index: u32,
    /// 1 on first delivery
    pub attempt: u32,
}

impl SummaryTask {
    pub fn new(newspaper_id: impl Into<String>, index: u32) -> Self {
        Self {
            newspaper_id: newspaper_id.into(),
            index,
            attempt: 1,
        }
    }
}

/// At-least-once background summarization
///
/// Failed tasks are redelivered after `retry_backoff * attempt` until
/// `max_attempts` is reached.
#[derive(Debug, Clone)]
pub struct SummaryQueue {
    sender: mpsc::UnboundedSender<SummaryTask>,
}

impl SummaryQueue {
    /// Start the worker; it stops once every queue handle is dropped
    pub fn spawn(service: Arc<SummaryService>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = Worker {
            service,
            retry: sender.downgrade(),
        };
        let handle = tokio::spawn(worker.run(receiver));
        (Self { sender }, handle)
    }

    pub fn enqueue(&self, newspaper_id: impl Into<String>, index: u32) -> Result<()> {
        let task = SummaryTask::new(newspaper_id, index);
        tracing::debug!(newspaper_id = %task.newspaper_id, index, "Summary task queued");
        self.sender.send(task).map_err(|_| BoardError::QueueClosed)
    }
}

struct Worker {
    service: Arc<SummaryService>,
    retry: mpsc::WeakUnboundedSender<SummaryTask>,
}

impl Worker {
    async fn run(self, mut receiver: mpsc::UnboundedReceiver<SummaryTask>) {
        while let Some(task) = receiver.recv().await {
            self.process(task).await;
        }
        tracing::debug!("Summary queue stopped");
    }

    async fn process(&self, task: SummaryTask) {
        let err = match self.service.generate(&task.newspaper_id, task.index).await {
            Ok(thread) => {
                tracing::info!(
                    newspaper_id = %task.newspaper_id,
                    index = task.index,
                    thread_id = %thread.id,
                    attempt = task.attempt,
                    "Summary task completed"
                );
                return;
            }
            Err(err) => err,
        };

        let max_attempts = self.service.config().max_attempts;
        if !err.is_retryable() || task.attempt >= max_attempts {
            tracing::error!(
                newspaper_id = %task.newspaper_id,
                index = task.index,
                attempt = task.attempt,
                error = %err,
                "Summary task failed, giving up"
            );
            return;
        }

        tracing::warn!(
            newspaper_id = %task.newspaper_id,
            index = task.index,
            attempt = task.attempt,
            error = %err,
            "Summary task failed, will retry"
        );

        let delay = self.service.config().retry_backoff * task.attempt;
        let Some(sender) = self.retry.upgrade() else {
            return;
        };
        let next = SummaryTask {
            attempt: task.attempt + 1,
            ..task
        };
        tokio::spawn(redeliver(sender, next, delay));
    }
}

async fn redeliver(sender: mpsc::UnboundedSender<SummaryTask>, task: SummaryTask, delay: Duration) {
    tokio::time::sleep(delay).await;
    let _ = sender.send(task);
}
