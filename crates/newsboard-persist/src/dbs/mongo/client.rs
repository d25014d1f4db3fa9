use async_trait::async_trait;
use mongodb::Client;
use newsboard_types::{Newspaper, Post, StoredPost, Thread};

use super::repositories::{MongoNewspaperRepository, MongoPostRepository, MongoThreadRepository};
use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

pub struct MongoPersistenceClient {
    post_repo: MongoPostRepository,
    thread_repo: MongoThreadRepository,
    newspaper_repo: MongoNewspaperRepository,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and make sure the unique slot indexes exist
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        let post_repo = MongoPostRepository::new(&client, database);
        let thread_repo = MongoThreadRepository::new(&client, database);
        let newspaper_repo = MongoNewspaperRepository::new(&client, database);

        post_repo.ensure_indexes().await?;
        thread_repo.ensure_indexes().await?;

        tracing::info!(database = %database, "Connected to MongoDB");

        Ok(Self {
            post_repo,
            thread_repo,
            newspaper_repo,
        })
    }
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn list_posts(&self, thread_id: &str) -> Result<Vec<StoredPost>> {
        self.post_repo.list(thread_id).await
    }

    async fn count_posts(&self, thread_id: &str) -> Result<u64> {
        self.post_repo.count(thread_id).await
    }

    async fn append_post(&self, thread_id: &str, post: Post) -> Result<u64> {
        self.post_repo.append(thread_id, post).await
    }

    async fn put_post(&self, thread_id: &str, index: u64, post: Post) -> Result<()> {
        self.post_repo.put(thread_id, index, post).await
    }

    async fn delete_posts(&self, thread_id: &str) -> Result<u64> {
        self.post_repo.delete_all(thread_id).await
    }

    async fn get_thread(&self, newspaper_id: &str, index: u32) -> Result<Option<Thread>> {
        self.thread_repo.get(newspaper_id, index).await
    }

    async fn put_thread(&self, newspaper_id: &str, index: u32, thread: Thread) -> Result<()> {
        self.thread_repo.put(newspaper_id, index, thread).await
    }

    async fn list_threads(&self, newspaper_id: &str) -> Result<Vec<(u32, Thread)>> {
        self.thread_repo.list(newspaper_id).await
    }

    async fn get_newspaper(&self, newspaper_id: &str) -> Result<Option<Newspaper>> {
        self.newspaper_repo.get(newspaper_id).await
    }

    async fn put_newspaper(&self, newspaper: Newspaper) -> Result<()> {
        self.newspaper_repo.put(newspaper).await
    }

    async fn list_newspapers(&self) -> Result<Vec<Newspaper>> {
        self.newspaper_repo.list().await
    }
}
