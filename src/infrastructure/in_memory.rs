use crate::domain::collection::Collection;
use crate::domain::ports::{RecordStore, RecordWrite};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Collections = HashMap<Collection, HashMap<String, Vec<u8>>>;

/// A thread-safe in-memory record store.
///
/// Uses `Arc<RwLock<..>>` so clones share the same data. Batches are applied
/// under a single write lock, which makes them atomic for readers.
#[derive(Default, Clone)]
pub struct InMemoryRecordStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryRecordStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held in `collection`.
    pub async fn len(&self, collection: Collection) -> usize {
        let collections = self.collections.read().await;
        collections.get(&collection).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|records| records.get(key))
            .cloned())
    }

    async fn put(&self, collection: Collection, key: &str, value: Vec<u8>) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn write_batch(&self, writes: Vec<RecordWrite>) -> Result<()> {
        let mut collections = self.collections.write().await;
        for write in writes {
            collections
                .entry(write.collection)
                .or_default()
                .insert(write.key, write.value);
        }
        Ok(())
    }
}
