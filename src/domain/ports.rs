use super::collection::Collection;
use crate::error::Result;
use async_trait::async_trait;

/// A single pending write into a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordWrite {
    pub collection: Collection,
    pub key: String,
    pub value: Vec<u8>,
}

impl RecordWrite {
    pub fn new(collection: Collection, key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            collection,
            key: key.into(),
            value,
        }
    }
}

/// Key-value store partitioned into collections.
///
/// `get` returns `Ok(None)` for a missing key; errors are reserved for the
/// store itself failing.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, collection: Collection, key: &str, value: Vec<u8>) -> Result<()>;
    /// Applies every write or none of them.
    async fn write_batch(&self, writes: Vec<RecordWrite>) -> Result<()>;
}

pub type RecordStoreBox = Box<dyn RecordStore>;
