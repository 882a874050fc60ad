use crate::domain::ports::LedgerState;
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Column Family holding ledger entries keyed by address.
pub const CF_STATE: &str = "state";

/// A persistent ledger state backed by RocksDB.
///
/// Each `set` is committed through a single `WriteBatch`, so both sides of
/// a transfer land together or not at all.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBLedgerState {
    db: Arc<DB>,
}

impl RocksDBLedgerState {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "state" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_state = ColumnFamilyDescriptor::new(CF_STATE, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_state]).map_err(io::Error::other)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn state_cf(&self) -> io::Result<&ColumnFamily> {
        self.db
            .cf_handle(CF_STATE)
            .ok_or_else(|| io::Error::other("State column family not found"))
    }
}

#[async_trait]
impl LedgerState for RocksDBLedgerState {
    async fn get(&self, addresses: &[String]) -> io::Result<HashMap<String, Vec<u8>>> {
        let cf = self.state_cf()?;
        let values = self
            .db
            .multi_get_cf(addresses.iter().map(|address| (cf, address.as_bytes())));

        let mut found = HashMap::new();
        for (address, value) in addresses.iter().zip(values) {
            if let Some(bytes) = value.map_err(io::Error::other)? {
                found.insert(address.clone(), bytes);
            }
        }
        Ok(found)
    }

    async fn set(&self, entries: HashMap<String, Vec<u8>>) -> io::Result<()> {
        let cf = self.state_cf()?;
        let mut batch = WriteBatch::default();
        for (address, value) in &entries {
            batch.put_cf(cf, address.as_bytes(), value);
        }
        self.db.write(batch).map_err(io::Error::other)
    }
}
