//! Ledger state backends and decorators.

pub mod in_memory;
pub mod namespaced;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
