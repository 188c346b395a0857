//! Durable key-value persistence shared by the state and config stores.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::CoreError;

/// A string-to-string store with synchronous writes.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`. Durable once this returns `Ok`.
    fn set(&mut self, key: &str, value: String) -> crate::Result<()>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Volatile store, used in tests and when no storage file is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> crate::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// A JSON object file holding every key. The whole file is rewritten on each
/// mutation, so what is on disk always matches memory after a call returns.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(json) => match serde_json::from_str::<BTreeMap<String, String>>(&json) {
                    Ok(entries) => {
                        info!("Opened storage {} ({} keys)", path.display(), entries.len());
                        entries
                    }
                    Err(e) => {
                        warn!("Storage file {} is malformed, starting empty: {e}", path.display());
                        BTreeMap::new()
                    }
                },
                Err(e) => {
                    warn!("Failed to read storage file {}: {e}", path.display());
                    BTreeMap::new()
                }
            }
        } else {
            debug!("No storage file at {}", path.display());
            BTreeMap::new()
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| CoreError::StorageIo {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| CoreError::StorageSerialize(e.to_string()))?;
        fs::write(&self.path, json).map_err(|source| CoreError::StorageIo {
            path: self.path.clone(),
            source,
        })?;
        debug!("Flushed storage to {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> crate::Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_survives_reopen() {
        let dir = std::env::temp_dir().join("shinydex_test_file_store");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("storage.json");

        let mut store = FileStore::open(&path);
        assert_eq!(store.get("a"), None);
        store.set("a", "1".into()).unwrap();
        store.set("b", "true".into()).unwrap();
        store.set("a", "{}".into()).unwrap();

        let reopened = FileStore::open(store.path());
        assert_eq!(reopened.get("a").as_deref(), Some("{}"));
        assert_eq!(reopened.get("b").as_deref(), Some("true"));
        assert_eq!(reopened.get("c"), None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_opens_empty() {
        let dir = std::env::temp_dir().join("shinydex_test_malformed_store");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("storage.json");
        fs::write(&path, "[1, 2, 3").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("anything"), None);

        let _ = fs::remove_dir_all(&dir);
    }
}
