//! # Key-Value Store
//!
//! The single seam between the counter and whatever keeps its state.
//!
//! ```text
//!   MenuRepository ─┐                         ┌─► SqliteStore  (kv_store table)
//!   CartRepository ─┼─► dyn KeyValueStore ────┤
//!  SalesRepository ─┘                         └─► MemoryStore  (HashMap)
//! ```
//!
//! Values are JSON text. The store never parses them, so a corrupt value
//! comes back exactly as written and the repository decides what to do.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{DbError, DbResult};

/// Synchronous string key → JSON text storage.
pub trait KeyValueStore: Send + Sync {
    /// Reads a key. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Writes a key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> DbResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        (**self).set(key, value)
    }
}

/// Process-local store.
///
/// Nothing survives the process. Writes can be switched off to simulate a
/// browser that has hit its storage quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    reject_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// When `true`, every `set` fails with [`DbError::Unavailable`].
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| DbError::Internal(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("quota exceeded".to_string()));
        }

        let mut entries = self
            .entries
            .lock()
            .map_err(|e| DbError::Internal(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
