use std::str::FromStr;
use std::sync::Arc;

use crate::dbs::memory::MemoryPersistenceClient;
use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

/// Which store backs the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Memory,
    MongoDb,
}

impl FromStr for StorageBackend {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            other => Err(PersistError::UnsupportedBackend(other.to_string())),
        }
    }
}

pub struct PersistClientBuilder {
    backend: StorageBackend,
    mongodb_uri: Option<String>,
    database: Option<String>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            backend: StorageBackend::Memory,
            mongodb_uri: None,
            database: None,
        }
    }

    pub fn backend(mut self, backend: StorageBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub async fn build(self) -> Result<Arc<dyn PersistenceClient>> {
        match self.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryPersistenceClient::new())),
            StorageBackend::MongoDb => self.build_mongo().await,
        }
    }

    #[cfg(feature = "mongodb")]
    async fn build_mongo(self) -> Result<Arc<dyn PersistenceClient>> {
        let mongodb_uri = self
            .mongodb_uri
            .ok_or_else(|| PersistError::Internal("mongodb_uri is required".to_string()))?;
        let database = self
            .database
            .ok_or_else(|| PersistError::Internal("database is required".to_string()))?;

        let client =
            crate::dbs::mongo::MongoPersistenceClient::connect(&mongodb_uri, &database).await?;
        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn build_mongo(self) -> Result<Arc<dyn PersistenceClient>> {
        Err(PersistError::UnsupportedBackend(
            "mongodb (crate built without the `mongodb` feature)".to_string(),
        ))
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!(" MongoDB ".parse::<StorageBackend>().unwrap(), StorageBackend::MongoDb);
        assert!(matches!(
            "redis".parse::<StorageBackend>(),
            Err(PersistError::UnsupportedBackend(name)) if name == "redis"
        ));
    }

    #[tokio::test]
    async fn test_default_builder_is_memory() {
        let client = PersistClientBuilder::new().build().await.unwrap();
        assert_eq!(client.backend_name(), "memory");
    }
}
