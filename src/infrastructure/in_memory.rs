use crate::domain::ports::LedgerState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger state.
///
/// Uses `Arc<RwLock<HashMap<String, Vec<u8>>>>` so clones share the same
/// entries. A `set` takes the write lock once for all of its entries, which
/// makes multi-entry commits atomic to readers.
#[derive(Default, Clone)]
pub struct InMemoryLedgerState {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryLedgerState {
    /// Creates a new, empty in-memory state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of addresses holding a value.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl LedgerState for InMemoryLedgerState {
    async fn get(&self, addresses: &[String]) -> io::Result<HashMap<String, Vec<u8>>> {
        let entries = self.entries.read().await;
        Ok(addresses
            .iter()
            .filter_map(|address| {
                entries
                    .get(address)
                    .map(|value| (address.clone(), value.clone()))
            })
            .collect())
    }

    async fn set(&self, updates: HashMap<String, Vec<u8>>) -> io::Result<()> {
        let mut entries = self.entries.write().await;
        entries.extend(updates);
        Ok(())
    }
}
