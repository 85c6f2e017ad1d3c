//! Injected key-value persistence capability.

use std::collections::HashMap;
use std::sync::Mutex;

/// Errors from the key-value layer.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Small string key-value store for persisted blobs.
///
/// Reads and writes are synchronous; at leaderboard scale a write blocks
/// nothing of consequence. Implementations must tolerate concurrent use
/// through a shared reference.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    fn put(&self, key: &str, value: &str) -> Result<(), KvError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
