//! Durable slots holding the serialized store snapshot.
//!
//! A slot stores exactly one payload under one name. Every save replaces the
//! whole payload.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

mod file;
mod migrations;
mod sqlite;

pub use file::JsonFileSlot;
pub use sqlite::SqliteSlot;

pub trait SnapshotSlot: Send {
    /// Returns the stored payload, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored payload.
    fn save(&mut self, payload: &str) -> Result<()>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// In-process slot. Clones share the same buffer, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    payload: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }

    pub fn payload(&self) -> Option<String> {
        match self.payload.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SnapshotSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>> {
        let guard = self
            .payload
            .lock()
            .map_err(|_| anyhow!("memory slot lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&mut self, payload: &str) -> Result<()> {
        let mut guard = self
            .payload
            .lock()
            .map_err(|_| anyhow!("memory slot lock poisoned"))?;
        *guard = Some(payload.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
