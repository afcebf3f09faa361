//! services/client/src/adapters/memory_storage.rs
//!
//! An in-process `SessionStorage`, used for ephemeral sessions and tests.

use std::collections::HashMap;
use std::sync::Mutex;
use tradevision_core::ports::{PortError, PortResult, SessionStorage};

#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated storage, as if a previous run had persisted `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }

    fn lock(&self) -> PortResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| PortError::Storage("storage lock poisoned".to_string()))
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
