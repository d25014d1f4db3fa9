use futures::TryStreamExt;
use mongodb::options::IndexOptions;
use mongodb::{bson::doc, Client, Collection, IndexModel};
use newsboard_types::Thread;

use crate::dbs::mongo::models::MongoThread;
use crate::error::{PersistError, Result};

#[derive(Clone)]
pub struct MongoThreadRepository {
    collection: Collection<MongoThread>,
}

impl MongoThreadRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("threads");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "newspaper_id": 1, "index": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    pub async fn get(&self, newspaper_id: &str, index: u32) -> Result<Option<Thread>> {
        let filter = doc! { "newspaper_id": newspaper_id, "index": i64::from(index) };
        Ok(self.collection.find_one(filter).await?.map(Into::into))
    }

    /// Insert or replace the metadata stored at `(newspaper_id, index)`
    pub async fn put(&self, newspaper_id: &str, index: u32, thread: Thread) -> Result<()> {
        let filter = doc! { "newspaper_id": newspaper_id, "index": i64::from(index) };
        self.collection
            .replace_one(filter, MongoThread::new(newspaper_id, index, thread))
            .upsert(true)
            .await?;
        Ok(())
    }

    pub async fn list(&self, newspaper_id: &str) -> Result<Vec<(u32, Thread)>> {
        let docs: Vec<MongoThread> = self
            .collection
            .find(doc! { "newspaper_id": newspaper_id })
            .sort(doc! { "index": 1 })
            .await?
            .try_collect()
            .await?;

        docs.into_iter()
            .map(|doc| {
                let index = u32::try_from(doc.index)
                    .map_err(|e| PersistError::Internal(e.to_string()))?;
                Ok((index, doc.into()))
            })
            .collect()
    }
}
