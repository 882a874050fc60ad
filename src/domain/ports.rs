use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;

/// Key/value ledger state as seen by a handler.
///
/// Keys are ledger addresses, values are opaque bytes. Implementations
/// must apply every entry of a single `set` call atomically: a reader
/// sees either none or all of them.
#[async_trait]
pub trait LedgerState: Send + Sync {
    /// Reads the given addresses. Absent addresses are omitted from the
    /// result rather than reported as errors.
    async fn get(&self, addresses: &[String]) -> io::Result<HashMap<String, Vec<u8>>>;

    /// Writes one or more entries as a single commit.
    async fn set(&self, entries: HashMap<String, Vec<u8>>) -> io::Result<()>;
}

/// Type alias for a boxed LedgerState trait object.
pub type LedgerStateBox = Box<dyn LedgerState>;

/// The capability a transaction family registers with the runtime.
#[async_trait]
pub trait LedgerHandler: Send + Sync {
    fn family_name(&self) -> &str;

    fn family_version(&self) -> &str;

    /// Address prefix this handler owns. The runtime routes instructions
    /// by it and confines the handler's state access to it.
    fn namespace(&self) -> &str;

    /// Applies a single instruction signed by `signer`.
    async fn apply(&self, payload: &[u8], signer: &str, state: &dyn LedgerState) -> Result<()>;
}

/// Type alias for a boxed LedgerHandler trait object.
pub type LedgerHandlerBox = Box<dyn LedgerHandler>;
