//! In-process session storage.

use crate::error::StorageError;
use crate::providers::SessionStorage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Session storage kept in memory for the lifetime of the process.
///
/// Clones share the same map, so a store and a test can look at the same
/// entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }

    /// Whether nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("Mutex lock failed".to_string()))
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
