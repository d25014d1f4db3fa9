use futures::TryStreamExt;
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{bson::doc, Client, Collection, IndexModel};
use newsboard_types::{Post, StoredPost};

use crate::dbs::mongo::models::{MongoPost, PostCounter};
use crate::error::{PersistError, Result};

#[derive(Clone)]
pub struct MongoPostRepository {
    posts: Collection<MongoPost>,
    counters: Collection<PostCounter>,
}

impl MongoPostRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let database = client.database(db_name);
        Self {
            posts: database.collection("posts"),
            counters: database.collection("post_counters"),
        }
    }

    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "thread_id": 1, "index": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.posts.create_index(index).await?;
        Ok(())
    }

    /// Posts of a thread in sequence order
    pub async fn list(&self, thread_id: &str) -> Result<Vec<StoredPost>> {
        let docs: Vec<MongoPost> = self
            .posts
            .find(doc! { "thread_id": thread_id })
            .sort(doc! { "index": 1 })
            .await?
            .try_collect()
            .await?;

        docs.into_iter()
            .map(|doc| {
                let index = u64::try_from(doc.index)
                    .map_err(|e| PersistError::Internal(e.to_string()))?;
                Ok(StoredPost {
                    index,
                    post: doc.into(),
                })
            })
            .collect()
    }

    pub async fn count(&self, thread_id: &str) -> Result<u64> {
        Ok(self
            .posts
            .count_documents(doc! { "thread_id": thread_id })
            .await?)
    }

    /// Reserve the next slot with an atomic `$inc`, then write the post there
    pub async fn append(&self, thread_id: &str, post: Post) -> Result<u64> {
        let counter = self
            .counters
            .find_one_and_update(doc! { "_id": thread_id }, doc! { "$inc": { "seq": 1_i64 } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| {
                PersistError::Internal(format!("No sequence counter returned for thread {}", thread_id))
            })?;

        let index = counter.seq - 1;
        self.posts
            .insert_one(MongoPost::new(thread_id, index, post))
            .await?;

        u64::try_from(index).map_err(|e| PersistError::Internal(e.to_string()))
    }

    /// Overwrite the slot at `index`, keeping the counter ahead of it
    pub async fn put(&self, thread_id: &str, index: u64, post: Post) -> Result<()> {
        let index = i64::try_from(index).map_err(|e| PersistError::Internal(e.to_string()))?;

        self.posts
            .replace_one(
                doc! { "thread_id": thread_id, "index": index },
                MongoPost::new(thread_id, index, post),
            )
            .upsert(true)
            .await?;

        self.counters
            .update_one(doc! { "_id": thread_id }, doc! { "$max": { "seq": index + 1 } })
            .upsert(true)
            .await?;

        Ok(())
    }

    /// Drop the thread's posts and its sequence counter
    pub async fn delete_all(&self, thread_id: &str) -> Result<u64> {
        let deleted = self
            .posts
            .delete_many(doc! { "thread_id": thread_id })
            .await?
            .deleted_count;
        self.counters.delete_one(doc! { "_id": thread_id }).await?;
        Ok(deleted)
    }
}
