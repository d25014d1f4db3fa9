pub mod builder;
pub mod dbs;
pub mod error;
pub mod trait_client;

pub use builder::{PersistClientBuilder, StorageBackend};
pub use dbs::memory::{KeyPart, KvStore, MemoryPersistenceClient};
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
pub use error::{PersistError, Result};
pub use trait_client::PersistenceClient;
