//! Synchronous key-value storage for learned policies.
//!
//! Learners depend on the `Storage` trait only. Backends are shared through
//! `Rc<dyn Storage>`, so they take `&self` and keep their state in a `RefCell`.

use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::StorageError;

/// A store of JSON values by string key.
pub trait Storage {
    /// Return the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Store `value` under `key`, replacing what was there.
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// Storage for when there's nowhere to persist to. Reads find nothing and writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStorage;

impl Storage for NoStorage {
    fn get(&self, _key: &str) -> Result<Option<Value>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: Value) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of keys stored.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.values.borrow_mut().insert(key.to_owned(), value);
        Ok(())
    }
}

/// Storage that keeps each key as a `<key>.json` file in a directory.
#[derive(Debug, Clone)]
pub struct JsonDirStorage {
    dir: PathBuf,
}

impl JsonDirStorage {
    /// Use `dir` for storage, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::info!("{:<32}{:<32}", "using policy directory", dir.display());

        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
            && !key.starts_with('.');

        if valid {
            Ok(self.dir.join(format!("{}.json", key)))
        } else {
            Err(StorageError::InvalidKey(key.to_owned()))
        }
    }
}

impl Storage for JsonDirStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let path = self.path(key)?;
        fs::write(&path, serde_json::to_string(&value)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_storage_forgets_everything() {
        let storage = NoStorage;
        storage.set("q.p1", json!({"3": 1.5})).unwrap();

        assert!(storage.get("q.p1").unwrap().is_none());
    }

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage.set("q.p1", json!({"3": 1.5})).unwrap();
        storage.set("q.p1", json!({"4": -2.0})).unwrap();

        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get("q.p1").unwrap(), Some(json!({"4": -2.0})));
        assert_eq!(storage.get("q.p2").unwrap(), None);
    }

    #[test]
    fn json_dir_storage_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonDirStorage::open(dir.path()).unwrap();

        assert_eq!(storage.get("q.p1").unwrap(), None);
        storage.set("q.p1", json!({"17": 0.25})).unwrap();

        let reopened = JsonDirStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("q.p1").unwrap(), Some(json!({"17": 0.25})));
    }

    #[test]
    fn json_dir_storage_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonDirStorage::open(dir.path()).unwrap();

        assert!(matches!(
            storage.set("../escape", json!(1)),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
    }
}
