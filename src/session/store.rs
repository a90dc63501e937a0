//! Credential storage backends
//!
//! Storage is synchronous key/value access, the same contract a browser's
//! local storage gives the dashboard: every read sees the latest write, and
//! writes are durable before they return.

use crate::types::{ClientError, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Synchronous key/value store for session credentials.
pub trait CredentialStore: Send + Sync {
    /// Read a value, `None` when absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// JSON file store, written through on every mutation.
///
/// The file holds a flat `{ "key": "value" }` object. It is created, along
/// with its parent directory, on the first write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading existing values if the file exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| {
                ClientError::Storage(format!("Failed to read {}: {}", path.display(), e))
            })?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| {
                    ClientError::Storage(format!("Corrupt credential file {}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), entries = values.len(), "Opened credential store");

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ClientError::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }
        let raw = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, raw).map_err(|e| {
            ClientError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write();
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("access_token").is_none());

        store.set("access_token", "abc").unwrap();
        assert_eq!(store.get("access_token").as_deref(), Some("abc"));

        store.remove("access_token").unwrap();
        assert!(store.get("access_token").is_none());
        // removing twice is fine
        store.remove("access_token").unwrap();
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("refresh_token", "r-1").unwrap();
            store.set("access_token", "a-1").unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("refresh_token").as_deref(), Some("r-1"));
        assert_eq!(reopened.get("access_token").as_deref(), Some("a-1"));

        reopened.remove("access_token").unwrap();
        let again = FileStore::open(&path).unwrap();
        assert!(again.get("access_token").is_none());
        assert_eq!(again.get("refresh_token").as_deref(), Some("r-1"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("none.json")).unwrap();
        assert!(store.get("user").is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, ClientError::Storage(_)));
    }
}
