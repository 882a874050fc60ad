#![allow(dead_code)]

use async_trait::async_trait;
use simplewallet::domain::ports::LedgerState;
use simplewallet::infrastructure::in_memory::InMemoryLedgerState;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Error};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const HEADER: [&str; 4] = ["signer", "operation", "amount", "to"];

pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;

    for _ in 1..=rows {
        wtr.write_record(["alice", "deposit", "1", ""])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Wraps an in-memory state and counts every access.
#[derive(Default)]
pub struct RecordingState {
    pub inner: InMemoryLedgerState,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl RecordingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerState for RecordingState {
    async fn get(&self, addresses: &[String]) -> io::Result<HashMap<String, Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(addresses).await
    }

    async fn set(&self, entries: HashMap<String, Vec<u8>>) -> io::Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(entries).await
    }
}

/// A state whose reads and writes can be made to fail.
#[derive(Default)]
pub struct FlakyState {
    pub inner: InMemoryLedgerState,
    pub fail_gets: bool,
    pub fail_sets: bool,
}

#[async_trait]
impl LedgerState for FlakyState {
    async fn get(&self, addresses: &[String]) -> io::Result<HashMap<String, Vec<u8>>> {
        if self.fail_gets {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "validator went away"));
        }
        self.inner.get(addresses).await
    }

    async fn set(&self, entries: HashMap<String, Vec<u8>>) -> io::Result<()> {
        if self.fail_sets {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "validator went away"));
        }
        self.inner.set(entries).await
    }
}
