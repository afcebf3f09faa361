//! services/client/src/adapters/file_storage.rs
//!
//! A `SessionStorage` adapter that keeps the persisted keys in a small JSON
//! object on disk, so a session survives restarts of the CLI.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tradevision_core::ports::{PortError, PortResult, SessionStorage};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Stores every key of the session in one JSON file.
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> PortResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                PortError::Storage(format!("Corrupt storage file {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(PortError::Storage(e.to_string())),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> PortResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PortError::Storage(e.to_string()))?;
            }
        }
        let raw = serde_json::to_string_pretty(values)
            .map_err(|e| PortError::Storage(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| PortError::Storage(e.to_string()))
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> PortResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| PortError::Storage("storage lock poisoned".to_string()))?;
        // A corrupt file is replaced rather than blocking every later write.
        let mut values = self.read_all().unwrap_or_default();
        f(&mut values);
        self.write_all(&values)
    }
}

//=========================================================================================
// `SessionStorage` Trait Implementation
//=========================================================================================

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| PortError::Storage("storage lock poisoned".to_string()))?;
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.modify(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.modify(|values| {
            values.remove(key);
        })
    }
}
