use newsboard_persist::PersistError;
use thiserror::Error;

use crate::registry::DeliveryError;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Thread not found: newspaper {newspaper_id}, index {index}")]
    ThreadNotFound { newspaper_id: String, index: u32 },

    #[error("Newspaper not found: {0}")]
    NewspaperNotFound(String),

    #[error("Thread {thread_id} is full ({limit} posts)")]
    ThreadFull { thread_id: String, limit: u64 },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Delivery failed: {0}")]
    Transport(#[from] DeliveryError),

    #[error("Event encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Summary queue is not running")]
    QueueClosed,

    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl BoardError {
    pub fn thread_not_found(newspaper_id: impl Into<String>, index: u32) -> Self {
        BoardError::ThreadNotFound {
            newspaper_id: newspaper_id.into(),
            index,
        }
    }

    /// Whether a background task hitting this error may succeed on redelivery
    pub fn is_retryable(&self) -> bool {
        matches!(self, BoardError::Upstream(_) | BoardError::Persist(_))
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
