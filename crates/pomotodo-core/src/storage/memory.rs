use std::cell::RefCell;
use std::collections::HashMap;

use super::StoragePort;
use crate::error::StorageError;

/// Process-local storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RefCell<HashMap<String, serde_json::Value>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails, for exercising write-error paths.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seed a raw record without going through `save`.
    pub fn insert(&self, key: &str, value: serde_json::Value) {
        self.records.borrow_mut().insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.records.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl StoragePort for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QueryFailed(format!("write to '{key}' refused")));
        }
        self.insert(key, value.clone());
        Ok(())
    }
}
