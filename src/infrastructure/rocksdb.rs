use crate::domain::collection::Collection;
use crate::domain::ports::{RecordStore, RecordWrite};
use crate::error::{RegistryError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;

/// A persistent record store implementation using RocksDB.
///
/// Each collection is its own column family, named after the collection.
/// Batches go through a single `WriteBatch`, so they commit atomically.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, creating
    /// one column family per collection if missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = Collection::ALL
            .into_iter()
            .map(|c| ColumnFamilyDescriptor::new(c.name(), Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, collection: Collection) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(collection.name()).ok_or_else(|| {
            RegistryError::StoreError(format!("Column family {} not found", collection))
        })
    }
}

fn store_error(action: &str, collection: Collection, err: rocksdb::Error) -> RegistryError {
    RegistryError::StoreError(format!("Failed to {} {}: {}", action, collection, err))
}

#[async_trait]
impl RecordStore for RocksDBStore {
    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.cf(collection)?;
        self.db
            .get_cf(cf, key.as_bytes())
            .map_err(|e| store_error("read from", collection, e))
    }

    async fn put(&self, collection: Collection, key: &str, value: Vec<u8>) -> Result<()> {
        let cf = self.cf(collection)?;
        self.db
            .put_cf(cf, key.as_bytes(), value)
            .map_err(|e| store_error("write to", collection, e))
    }

    async fn write_batch(&self, writes: Vec<RecordWrite>) -> Result<()> {
        let mut batch = WriteBatch::default();
        for write in &writes {
            batch.put_cf(self.cf(write.collection)?, write.key.as_bytes(), &write.value);
        }
        self.db.write(batch).map_err(|e| {
            RegistryError::StoreError(format!("Failed to commit write batch: {}", e))
        })
    }
}
