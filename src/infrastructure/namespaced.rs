use crate::domain::ports::LedgerState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;

/// Restricts a ledger state to the address prefixes a caller may touch.
///
/// A prefix may be a whole namespace or a single full address, so the same
/// wrapper confines a handler to its namespace or an instruction to the
/// accounts it declared. Any `get` or `set` touching an address outside
/// those prefixes fails with [`io::ErrorKind::PermissionDenied`] before
/// reaching the inner state, so a rejected `set` writes nothing.
pub struct NamespacedState<'a> {
    inner: &'a dyn LedgerState,
    prefixes: Vec<String>,
}

impl<'a> NamespacedState<'a> {
    pub fn new(inner: &'a dyn LedgerState, prefixes: Vec<String>) -> Self {
        Self { inner, prefixes }
    }

    fn check<'b>(&self, mut addresses: impl Iterator<Item = &'b String>) -> io::Result<()> {
        match addresses.find(|address| {
            !self
                .prefixes
                .iter()
                .any(|prefix| address.starts_with(prefix.as_str()))
        }) {
            Some(address) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("address {address} is outside the permitted prefixes"),
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerState for NamespacedState<'_> {
    async fn get(&self, addresses: &[String]) -> io::Result<HashMap<String, Vec<u8>>> {
        self.check(addresses.iter())?;
        self.inner.get(addresses).await
    }

    async fn set(&self, entries: HashMap<String, Vec<u8>>) -> io::Result<()> {
        self.check(entries.keys())?;
        self.inner.set(entries).await
    }
}
