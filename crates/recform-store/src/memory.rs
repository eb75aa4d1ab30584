#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{RecordStore, StoreError, StoreResult};

/// In-memory store for tests and ephemeral sessions.
///
/// Values are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<String, String>>> {
        self.data
            .read()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.data
            .write()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        self.write()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.write()?.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStore")
            .field("entries", &count)
            .finish()
    }
}
