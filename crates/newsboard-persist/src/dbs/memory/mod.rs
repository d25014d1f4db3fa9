mod client;
mod kv;

pub use client::MemoryPersistenceClient;
pub use kv::{Key, KeyPart, KvStore};
