use async_trait::async_trait;
use newsboard_types::{Newspaper, Post, StoredPost, Thread};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::kv::{Key, KeyPart, KvStore};
use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

const POSTS: &str = "posts";
const THREADS: &str = "threads";
const NEWSPAPERS: &str = "newspapers";

/// Persistence backed by the in-process ordered KV store
///
/// Layout:
/// - `["posts", thread_id, index]` → `Post`
/// - `["threads", newspaper_id, index]` → `Thread`
/// - `["newspapers", newspaper_id]` → `Newspaper`
#[derive(Debug, Default)]
pub struct MemoryPersistenceClient {
    kv: KvStore,
}

impl MemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Underlying store, for inspection in tests and tooling
    pub fn kv(&self) -> &KvStore {
        &self.kv
    }
}

fn posts_prefix(thread_id: &str) -> Key {
    vec![KeyPart::from(POSTS), KeyPart::from(thread_id)]
}

fn threads_prefix(newspaper_id: &str) -> Key {
    vec![KeyPart::from(THREADS), KeyPart::from(newspaper_id)]
}

fn thread_key(newspaper_id: &str, index: u32) -> Key {
    let mut key = threads_prefix(newspaper_id);
    key.push(KeyPart::from(index));
    key
}

fn newspaper_key(newspaper_id: &str) -> Key {
    vec![KeyPart::from(NEWSPAPERS), KeyPart::from(newspaper_id)]
}

fn trailing_index(key: &Key) -> Result<u64> {
    match key.last() {
        Some(KeyPart::Int(index)) => Ok(*index),
        _ => Err(PersistError::Internal(format!(
            "Expected numeric key suffix, found {:?}",
            key
        ))),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

#[async_trait]
impl PersistenceClient for MemoryPersistenceClient {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_posts(&self, thread_id: &str) -> Result<Vec<StoredPost>> {
        self.kv
            .list(&posts_prefix(thread_id))
            .await
            .into_iter()
            .map(|(key, value)| {
                Ok(StoredPost {
                    index: trailing_index(&key)?,
                    post: decode(value)?,
                })
            })
            .collect()
    }

    async fn count_posts(&self, thread_id: &str) -> Result<u64> {
        Ok(self.kv.count(&posts_prefix(thread_id)).await as u64)
    }

    async fn append_post(&self, thread_id: &str, post: Post) -> Result<u64> {
        let value = serde_json::to_value(&post)?;
        Ok(self.kv.append(&posts_prefix(thread_id), value).await)
    }

    async fn put_post(&self, thread_id: &str, index: u64, post: Post) -> Result<()> {
        let mut key = posts_prefix(thread_id);
        key.push(KeyPart::from(index));
        self.kv.set(key, serde_json::to_value(&post)?).await;
        Ok(())
    }

    async fn delete_posts(&self, thread_id: &str) -> Result<u64> {
        Ok(self.kv.remove_prefix(&posts_prefix(thread_id)).await as u64)
    }

    async fn get_thread(&self, newspaper_id: &str, index: u32) -> Result<Option<Thread>> {
        self.kv
            .get(&thread_key(newspaper_id, index))
            .await
            .map(decode)
            .transpose()
    }

    async fn put_thread(&self, newspaper_id: &str, index: u32, thread: Thread) -> Result<()> {
        self.kv
            .set(thread_key(newspaper_id, index), serde_json::to_value(&thread)?)
            .await;
        Ok(())
    }

    async fn list_threads(&self, newspaper_id: &str) -> Result<Vec<(u32, Thread)>> {
        self.kv
            .list(&threads_prefix(newspaper_id))
            .await
            .into_iter()
            .map(|(key, value)| {
                let index = u32::try_from(trailing_index(&key)?)
                    .map_err(|e| PersistError::Internal(e.to_string()))?;
                Ok((index, decode(value)?))
            })
            .collect()
    }

    async fn get_newspaper(&self, newspaper_id: &str) -> Result<Option<Newspaper>> {
        self.kv
            .get(&newspaper_key(newspaper_id))
            .await
            .map(decode)
            .transpose()
    }

    async fn put_newspaper(&self, newspaper: Newspaper) -> Result<()> {
        let key = newspaper_key(&newspaper.id);
        self.kv.set(key, serde_json::to_value(&newspaper)?).await;
        Ok(())
    }

    async fn list_newspapers(&self) -> Result<Vec<Newspaper>> {
        self.kv
            .list(&[KeyPart::from(NEWSPAPERS)])
            .await
            .into_iter()
            .map(|(_, value)| decode(value))
            .collect()
    }
}
