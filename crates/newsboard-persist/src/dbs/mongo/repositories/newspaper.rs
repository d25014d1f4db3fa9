use futures::TryStreamExt;
use mongodb::{bson::doc, Client, Collection};
use newsboard_types::Newspaper;

use crate::dbs::mongo::models::MongoNewspaper;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoNewspaperRepository {
    collection: Collection<MongoNewspaper>,
}

impl MongoNewspaperRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("newspapers");
        Self { collection }
    }

    pub async fn get(&self, newspaper_id: &str) -> Result<Option<Newspaper>> {
        let filter = doc! { "_id": newspaper_id };
        Ok(self.collection.find_one(filter).await?.map(Into::into))
    }

    pub async fn put(&self, newspaper: Newspaper) -> Result<()> {
        let filter = doc! { "_id": newspaper.id.as_str() };
        self.collection
            .replace_one(filter, MongoNewspaper::from(newspaper))
            .upsert(true)
            .await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Newspaper>> {
        let docs: Vec<MongoNewspaper> = self
            .collection
            .find(doc! {})
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(Into::into).collect())
    }
}
