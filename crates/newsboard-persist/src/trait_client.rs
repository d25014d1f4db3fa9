use async_trait::async_trait;
use newsboard_types::{Newspaper, Post, StoredPost, Thread};

use crate::error::Result;

/// Storage operations the board needs from its key-value collaborator
///
/// Posts are keyed by `(thread_id, sequence_index)`, thread metadata by
/// `(newspaper_id, thread_index)`, editions by their id.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Short backend label for health output
    fn backend_name(&self) -> &'static str;

    /// All posts of a thread, ordered by sequence index
    async fn list_posts(&self, thread_id: &str) -> Result<Vec<StoredPost>>;

    /// Number of posts stored for a thread
    async fn count_posts(&self, thread_id: &str) -> Result<u64>;

    /// Append a post and return the sequence index it was stored at
    ///
    /// The index equals the post count observed inside the same atomic
    /// step, so two appends never receive the same slot.
    async fn append_post(&self, thread_id: &str, post: Post) -> Result<u64>;

    /// Write a post at an explicit index (seeding)
    async fn put_post(&self, thread_id: &str, index: u64, post: Post) -> Result<()>;

    /// Remove every post of a thread and reset its sequence; returns how many went
    async fn delete_posts(&self, thread_id: &str) -> Result<u64>;

    async fn get_thread(&self, newspaper_id: &str, index: u32) -> Result<Option<Thread>>;

    async fn put_thread(&self, newspaper_id: &str, index: u32, thread: Thread) -> Result<()>;

    /// Threads of an edition with their indices, ordered by index
    async fn list_threads(&self, newspaper_id: &str) -> Result<Vec<(u32, Thread)>>;

    async fn get_newspaper(&self, newspaper_id: &str) -> Result<Option<Newspaper>>;

    async fn put_newspaper(&self, newspaper: Newspaper) -> Result<()>;

    async fn list_newspapers(&self) -> Result<Vec<Newspaper>>;
}
