use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// One component of a composite key
///
/// Integers order before strings, so numbered children of a prefix are
/// listed in numeric order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyPart {
    Int(u64),
    Str(String),
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<u64> for KeyPart {
    fn from(value: u64) -> Self {
        KeyPart::Int(value)
    }
}

impl From<u32> for KeyPart {
    fn from(value: u32) -> Self {
        KeyPart::Int(u64::from(value))
    }
}

pub type Key = Vec<KeyPart>;

/// Ordered in-process key-value store with prefix listing
#[derive(Debug, Default)]
pub struct KvStore {
    entries: RwLock<BTreeMap<Key, Value>>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &[KeyPart]) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: Key, value: Value) {
        self.entries.write().await.insert(key, value);
    }

    /// Entries strictly below `prefix`, in key order
    pub async fn list(&self, prefix: &[KeyPart]) -> Vec<(Key, Value)> {
        let entries = self.entries.read().await;
        collect_prefix(&entries, prefix)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub async fn count(&self, prefix: &[KeyPart]) -> usize {
        let entries = self.entries.read().await;
        collect_prefix(&entries, prefix).count()
    }

    /// Remove every entry strictly below `prefix`
    pub async fn remove_prefix(&self, prefix: &[KeyPart]) -> usize {
        let mut entries = self.entries.write().await;
        let keys: Vec<Key> = collect_prefix(&entries, prefix)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            entries.remove(key);
        }
        keys.len()
    }

    /// Store `value` at `prefix + [count]` where `count` is the number of
    /// entries under `prefix`, in one write-locked step.
    pub async fn append(&self, prefix: &[KeyPart], value: Value) -> u64 {
        let mut entries = self.entries.write().await;
        let index = collect_prefix(&entries, prefix).count() as u64;

        let mut key = prefix.to_vec();
        key.push(KeyPart::Int(index));
        entries.insert(key, value);

        index
    }
}

fn collect_prefix<'a>(
    entries: &'a BTreeMap<Key, Value>,
    prefix: &'a [KeyPart],
) -> impl Iterator<Item = (&'a Key, &'a Value)> + 'a {
    entries
        .range(prefix.to_vec()..)
        .take_while(move |(key, _)| key.starts_with(prefix))
        .filter(move |(key, _)| key.len() > prefix.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(parts: &[KeyPart]) -> Key {
        parts.to_vec()
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_scoped() {
        let kv = KvStore::new();
        kv.set(key(&["posts".into(), "a".into(), 10u64.into()]), json!(10)).await;
        kv.set(key(&["posts".into(), "a".into(), 2u64.into()]), json!(2)).await;
        kv.set(key(&["posts".into(), "ab".into(), 0u64.into()]), json!("other")).await;
        kv.set(key(&["posts".into(), "a".into()]), json!("self")).await;

        let listed = kv.list(&["posts".into(), "a".into()]).await;
        let values: Vec<Value> = listed.into_iter().map(|(_, v)| v).collect();

        assert_eq!(values, vec![json!(2), json!(10)]);
    }

    #[tokio::test]
    async fn test_append_assigns_consecutive_indices() {
        let kv = KvStore::new();
        let prefix: Key = vec!["posts".into(), "t".into()];

        for expected in 0..4u64 {
            let index = kv.append(&prefix, json!(expected)).await;
            assert_eq!(index, expected);
        }
        assert_eq!(kv.count(&prefix).await, 4);
        assert_eq!(
            kv.get(&["posts".into(), "t".into(), 3u64.into()]).await,
            Some(json!(3))
        );
    }

    #[tokio::test]
    async fn test_remove_prefix_restarts_append() {
        let kv = KvStore::new();
        let prefix: Key = vec!["posts".into(), "t".into()];
        let sibling: Key = vec!["posts".into(), "u".into()];

        for value in 0..3u64 {
            kv.append(&prefix, json!(value)).await;
        }
        kv.append(&sibling, json!("keep")).await;

        assert_eq!(kv.remove_prefix(&prefix).await, 3);
        assert_eq!(kv.count(&prefix).await, 0);
        assert_eq!(kv.count(&sibling).await, 1);
        assert_eq!(kv.append(&prefix, json!("again")).await, 0);
    }
}
